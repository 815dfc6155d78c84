/// The magic bytes and trailing context byte that open every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixFields<const P: usize> {
    prefix: [u8; P],
}

impl<const P: usize> PrefixFields<P> {
    pub const SIZE: usize = P;

    pub fn new(prefix: [u8; P]) -> Self {
        const { assert!(P > 0) };
        Self {
            prefix,
        }
    }

    /// The whole prefix.
    pub fn prefix(&self) -> &[u8; P] {
        &self.prefix
    }

    /// The format magic, all prefix bytes but the last.
    pub fn magic(&self) -> &[u8] {
        &self.prefix[..P - 1]
    }

    /// The last prefix byte, encoding the format variant and address version.
    pub fn context(&self) -> u8 {
        self.prefix[P - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_and_context() {
        let prefix = PrefixFields::new([0x64, 0x3b, 0xf6, 0xa8, 0x9a]);
        assert_eq!(prefix.magic(), &[0x64, 0x3b, 0xf6, 0xa8]);
        assert_eq!(prefix.context(), 0x9a);
        assert_eq!(PrefixFields::<5>::SIZE, 5);

        let single = PrefixFields::new([0x42]);
        assert!(single.magic().is_empty());
        assert_eq!(single.context(), 0x42);
    }
}
