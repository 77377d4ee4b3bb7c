use soroban_sdk::{contracttype, Bytes, Env, Vec};

/// A single right a controller can hold over the protected account.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Capability {
    /// Every capability, including granting any role
    Admin = 0x0001,
    /// Overwrite roles and restriction lists of other controllers
    AddPermissions = 0x0002,
    /// Write arbitrary keys in the account's data store
    SetData = 0x0010,
    /// Make the account call other contracts
    Execute = 0x0100,
    /// Hand the account over to a new owner
    ChangeOwner = 0x1000,
}

pub const ALL_CAPABILITIES: [Capability; 5] = [
    Capability::Admin,
    Capability::AddPermissions,
    Capability::SetData,
    Capability::Execute,
    Capability::ChangeOwner,
];

impl Capability {
    pub const fn bit(self) -> u32 {
        self as u32
    }
}

/// Typed set of [`Capability`] flags.
///
/// Bits that do not name a capability are dropped on construction, so a
/// decoded value never carries more rights than its named flags.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);

    /// What `set_roles` installs when no explicit value is supplied.
    pub const OWNER: Permissions = Permissions(
        Capability::Admin.bit()
            | Capability::SetData.bit()
            | Capability::Execute.bit()
            | Capability::ChangeOwner.bit(),
    );

    pub const ALL: Permissions = Permissions(
        Capability::Admin.bit()
            | Capability::AddPermissions.bit()
            | Capability::SetData.bit()
            | Capability::Execute.bit()
            | Capability::ChangeOwner.bit(),
    );

    pub const fn from_bits(bits: u32) -> Self {
        Permissions(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `Admin` implies every other capability.
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & Capability::Admin.bit() != 0 || self.0 & capability.bit() != 0
    }

    pub const fn with(self, capability: Capability) -> Self {
        Permissions(self.0 | capability.bit())
    }

    pub fn from_capabilities(capabilities: &Vec<Capability>) -> Self {
        capabilities
            .iter()
            .fold(Self::NONE, |acc, capability| acc.with(capability))
    }

    /// Flags set explicitly, in declaration order. `Admin` is not expanded.
    pub fn capabilities(self, env: &Env) -> Vec<Capability> {
        let mut out = Vec::new(env);
        for capability in ALL_CAPABILITIES {
            if self.0 & capability.bit() != 0 {
                out.push_back(capability);
            }
        }
        out
    }

    /// 4-byte big-endian form stored in the account's data store.
    pub fn to_bytes(self, env: &Env) -> Bytes {
        Bytes::from_array(env, &self.0.to_be_bytes())
    }

    /// Decodes a stored value. Up to four bytes are read as a left-padded
    /// big-endian integer; longer values contribute their trailing four bytes.
    pub fn from_bytes(value: &Bytes) -> Self {
        let len = value.len();
        let start = len.saturating_sub(4);
        let mut bits: u32 = 0;
        for i in start..len {
            bits = (bits << 8) | value.get_unchecked(i) as u32;
        }
        Self::from_bits(bits)
    }

    /// Strict decoder for values supplied by a caller: at most four bytes,
    /// and every set bit must name a capability.
    pub fn try_from_bytes(value: &Bytes) -> Option<Self> {
        if value.len() > 4 {
            return None;
        }
        let mut bits: u32 = 0;
        for byte in value.iter() {
            bits = (bits << 8) | byte as u32;
        }
        if bits & !Self::ALL.0 != 0 {
            return None;
        }
        Some(Self(bits))
    }
}
