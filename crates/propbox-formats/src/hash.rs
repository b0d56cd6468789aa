//! Batch fingerprint over a list of props
//!
//! The fingerprint is a cheap "has this chunk changed" check. Props are
//! ordered by id, then their dates are folded with `h = h * 31 + date`
//! truncated to 32 bits at every step.
//!
//! Only `id` order and `date` values feed the hash. Two batches whose props
//! share ids and dates but differ in position or text collide. Callers
//! comparing fingerprints rely on this exact value, so it is kept as is.
//! It is not a cryptographic digest.

use crate::prop::Prop;

/// Fingerprint a batch of props. Returns 0 for an empty batch.
pub fn hash_props(props: &[Prop]) -> u32 {
    let mut sorted: Vec<&Prop> = props.iter().collect();
    // Stable, so equal ids keep their input order
    sorted.sort_by_key(|p| p.id);

    sorted.iter().fold(0u32, |h, p| fold_date(h, p.date))
}

/// One step of the fold: `(h << 5) - h + date`, modulo 2^32.
#[inline]
fn fold_date(h: u32, date: i64) -> u32 {
    (h << 5).wrapping_sub(h).wrapping_add(date as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(id: u32, date: i64) -> Prop {
        Prop::new(id, 1, 1, date, "p")
    }

    #[test]
    fn test_empty() {
        assert_eq!(hash_props(&[]), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(hash_props(&[prop(1, 5)]), 5);
        // 5 * 31 + 7
        assert_eq!(hash_props(&[prop(1, 5), prop(2, 7)]), 162);
        // Dates wider than 32 bits are reduced modulo 2^32
        assert_eq!(hash_props(&[prop(1, 1_700_000_000_000)]), 1_700_000_000_000u64 as u32);
        // Negative dates wrap the same way
        assert_eq!(hash_props(&[prop(1, -1)]), u32::MAX);
    }

    #[test]
    fn test_order_independent() {
        let a = [prop(3, 30), prop(1, 10), prop(2, 20)];
        let b = [prop(1, 10), prop(2, 20), prop(3, 30)];
        assert_eq!(hash_props(&a), hash_props(&b));
    }

    #[test]
    fn test_sensitive_to_date() {
        let a = [prop(1, 10), prop(2, 20)];
        let b = [prop(1, 10), prop(2, 21)];
        assert_ne!(hash_props(&a), hash_props(&b));
    }

    #[test]
    fn test_sensitive_to_count() {
        let a = [prop(1, 10), prop(2, 20)];
        assert_ne!(hash_props(&a), hash_props(&a[..1]));
    }

    #[test]
    fn test_ignores_position() {
        let a = [prop(1, 10)];
        let b = [prop(1, 10).with_position(5.0, 5.0, 5.0)];
        assert_eq!(hash_props(&a), hash_props(&b));
    }

    #[test]
    fn test_wraps_every_step() {
        let props: Vec<_> = (0..64).map(|i| prop(i, i64::from(u32::MAX))).collect();
        let expected = props
            .iter()
            .fold(0u64, |h, p| (h * 31 + (p.date as u64)) & 0xffff_ffff);
        assert_eq!(u64::from(hash_props(&props)), expected);
    }
}
