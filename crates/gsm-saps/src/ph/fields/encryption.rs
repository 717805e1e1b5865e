/// A5 ciphering algorithm as signalled in the RSL Encryption Information IE.
/// Holds the algorithm number n of A5/n. A5/0 means no encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CipherAlg(pub u8);

impl CipherAlg {
    pub const A5_0: CipherAlg = CipherAlg(0);
    pub const A5_1: CipherAlg = CipherAlg(1);
    pub const A5_3: CipherAlg = CipherAlg(3);

    #[inline]
    pub fn is_encrypting(&self) -> bool {
        self.0 != 0
    }
}

impl core::fmt::Display for CipherAlg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "A5/{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Encryption {
    pub alg: CipherAlg,
    /// Kc, empty for A5/0
    pub key: Vec<u8>,
}

impl Encryption {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(alg: CipherAlg, key: &[u8]) -> Self {
        Self { alg, key: key.to_vec() }
    }
}
