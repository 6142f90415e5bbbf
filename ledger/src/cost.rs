//! The single pricing rule.

use quadfund_types::{Credits, Votes};

/// Credits needed to hold `votes` votes on one proposal: `votes²`.
///
/// `Credits` is twice as wide as `Votes`, so the square never overflows.
pub fn quadratic_cost(votes: Votes) -> Credits {
    let v = Credits::from(votes);
    v * v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(quadratic_cost(0), 0);
        assert_eq!(quadratic_cost(1), 1);
        assert_eq!(quadratic_cost(2), 4);
        assert_eq!(quadratic_cost(3), 9);
        assert_eq!(quadratic_cost(5), 25);
    }

    #[test]
    fn largest_vote_count_fits() {
        let max = quadratic_cost(Votes::MAX);
        assert_eq!(max, u128::from(u64::MAX) * u128::from(u64::MAX));
    }
}
