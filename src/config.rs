//! Runtime configuration for a MiniLang interpreter instance.
//!
//! One [`crate::interpreter::Interpreter`] owns one [`Config`] for its whole
//! lifetime, passed in at construction, rather than reaching for a global or
//! thread-local: MiniLang is a self-contained program, not a library with
//! many independent callers.

/// Which names a called procedure can see.
///
/// MiniLang procedures never capture an enclosing environment (no
/// closures); this only controls whether the *callee's fresh scope* starts
/// empty or aliases the caller's [`crate::env::NameTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePolicy {
    /// The callee's scope starts empty; it can only see its own parameters
    /// and whatever it assigns itself. This is the default.
    #[default]
    Static,
    /// The callee executes directly in the caller's name table: assignments
    /// and reads see (and mutate) the caller's bindings.
    Dynamic,
}

/// Two behaviors for the built-in `intp`. A purely syntactic `intp` (true
/// only for a literal Number AST node) is a trap for callers, since
/// `intp(x)` then reads false even when `x` is bound to an integer; we
/// default to the semantic reading and expose the syntactic one as an
/// explicit opt-in rather than switching behavior silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntpMode {
    /// `intp(e)` is true iff `e` evaluates to a Number. The default.
    #[default]
    EvaluatesToInteger,
    /// `intp(e)` is true iff `e` is literally a Number AST node.
    SyntacticNumberLiteral,
}

/// The configuration of a single interpreter run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cons cells the heap may hold at once.
    pub heap_capacity: usize,
    /// Static vs. dynamic scoping for user procedures.
    pub scope_policy: ScopePolicy,
    /// Which `intp` semantics to use.
    pub intp_mode: IntpMode,
}

impl Config {
    pub fn new(heap_capacity: usize) -> Self {
        Config {
            heap_capacity,
            scope_policy: ScopePolicy::default(),
            intp_mode: IntpMode::default(),
        }
    }

    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = policy;
        self
    }

    pub fn with_intp_mode(mut self, mode: IntpMode) -> Self {
        self.intp_mode = mode;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        // 1024 cells is a generous default for interactive use; small test
        // programs typically configure something far smaller to exercise
        // the collector deliberately.
        Config::new(1024)
    }
}
