//! Permission codes
//!
//! Edge permissions are printed as a fixed-width, positional string so that
//! edge labels line up in the rendered graph.

/// Character printed for a permission slot that is not held.
pub const PLACEHOLDER: char = '_';

/// Slots in print order: permission name and its letter.
pub const SLOTS: [(&str, char); 4] = [
    ("write", 'w'),
    ("consistent-read", 'r'),
    ("write-unchanged", 'u'),
    ("resize", 's'),
];

/// Encode a permission set as four characters, one per slot in [`SLOTS`]
/// order. Names outside the known slots are ignored.
pub fn encode<S: AsRef<str>>(perms: &[S]) -> String {
    SLOTS
        .iter()
        .map(|(name, letter)| {
            if perms.iter().any(|p| p.as_ref() == *name) {
                *letter
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&NONE), "____");
    }

    #[test]
    fn test_encode_all() {
        assert_eq!(
            encode(&["resize", "write-unchanged", "consistent-read", "write"]),
            "wrus"
        );
    }

    #[test]
    fn test_every_subset_is_positional() {
        for mask in 0u8..16 {
            let set: Vec<&str> = SLOTS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, (name, _))| *name)
                .collect();
            let code: Vec<char> = encode(&set).chars().collect();

            assert_eq!(code.len(), 4);
            for (i, (_, letter)) in SLOTS.iter().enumerate() {
                let expected = if mask & (1 << i) != 0 { *letter } else { PLACEHOLDER };
                assert_eq!(code[i], expected, "mask {:04b}, slot {}", mask, i);
            }
        }
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        assert_eq!(encode(&["graph-mod", "write", "bogus"]), "w___");
    }

    #[test]
    fn test_duplicates_do_not_widen() {
        assert_eq!(encode(&["resize", "resize"]), "___s");
    }
}
