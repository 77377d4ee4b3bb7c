use soroban_sdk::{contracttype, Address, BytesN, Symbol, Val, Vec};

/// A call the protected account is asked to perform.
///
/// The gateway only inspects `target`, `function` and `standard` to evaluate
/// restrictions; the value is forwarded to the account unchanged.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Operation {
    /// Contract the account will invoke
    pub target: Address,
    /// Function name on the target
    pub function: Symbol,
    /// Interface id the caller declares the target implements
    pub standard: Option<BytesN<4>>,
    /// Arguments passed through to the target
    pub args: Vec<Val>,
}
