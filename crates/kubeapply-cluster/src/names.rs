//! Random, length-bounded resource names

use rand::Rng;

/// Characters used for the random suffix (valid in DNS labels)
const ALLOWED_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Build a name from `prefixes` joined by `-`, padded with random characters
///
/// The result is `length` characters long, unless the prefix part (with its
/// trailing `-`) already reaches `length`, in which case it is returned as is.
///
/// ```
/// use kubeapply_cluster::random_name;
///
/// let name = random_name(24, &["ephemeral", "cluster"]);
/// assert!(name.starts_with("ephemeral-cluster-"));
/// assert_eq!(name.len(), 24);
/// ```
pub fn random_name(length: usize, prefixes: &[&str]) -> String {
    let mut name = prefixes.join("-");
    name.push('-');

    let remaining = length.saturating_sub(name.len());
    if remaining == 0 {
        return name;
    }

    let mut rng = rand::rng();
    name.extend((0..remaining).map(|_| {
        let idx = rng.random_range(0..ALLOWED_CHARS.len());
        ALLOWED_CHARS[idx] as char
    }));
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_prefix() {
        let name = random_name(24, &["ephemeral", "cluster"]);

        assert_eq!(name.len(), 24);
        assert!(name.starts_with("ephemeral-cluster-"));
        assert!(
            name["ephemeral-cluster-".len()..]
                .bytes()
                .all(|b| ALLOWED_CHARS.contains(&b))
        );
    }

    #[test]
    fn test_prefix_longer_than_length() {
        assert_eq!(random_name(5, &["ephemeral", "cluster"]), "ephemeral-cluster-");
        assert_eq!(random_name(18, &["ephemeral", "cluster"]), "ephemeral-cluster-");
    }

    #[test]
    fn test_no_prefixes() {
        let name = random_name(8, &[]);
        assert_eq!(name.len(), 8);
        assert!(name.starts_with('-'));
    }

    #[test]
    fn test_names_differ() {
        let a = random_name(40, &["ns"]);
        let b = random_name(40, &["ns"]);
        assert_ne!(a, b);
    }
}
