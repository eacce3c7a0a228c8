//! The [`Tank`] entity: a bounded fluid reservoir.

/// A bounded fluid reservoir.
///
/// The volume is always clamped to `[0, capacity]`. The fill ratio is
/// computed from the volume on demand and never stored, so it cannot
/// desynchronize from the volume.
///
/// Emptiness and fullness are judged against a small `level_epsilon`
/// (reference value 0.1 absolute units). The epsilon exists to avoid
/// flow oscillation from floating-point residue near the boundaries,
/// not as a physical threshold.
///
/// Every operation is a total function over the clamped domain; there
/// are no error conditions. A transfer that cannot be honored in full
/// simply returns the smaller amount that was actually moved.
#[derive(Clone, Debug, PartialEq)]
pub struct Tank {
    capacity: f64,
    volume: f64,
    level_epsilon: f64,
}

impl Tank {
    /// Create an empty tank.
    ///
    /// Callers are expected to pass a positive finite capacity and an
    /// epsilon in `(0, capacity)`; the engine validates its config
    /// before constructing tanks.
    pub fn new(capacity: f64, level_epsilon: f64) -> Self {
        Self {
            capacity,
            volume: 0.0,
            level_epsilon,
        }
    }

    /// Add up to `amount` units, clamped to the remaining headroom.
    ///
    /// Returns the amount actually added. A return value smaller than
    /// `amount` means the tank became full mid-transfer — not an error.
    /// Negative requests add nothing.
    pub fn add(&mut self, amount: f64) -> f64 {
        let added = amount.min(self.capacity - self.volume).max(0.0);
        self.volume += added;
        added
    }

    /// Remove up to `amount` units, clamped to the current volume.
    ///
    /// Returns the amount actually removed. Negative requests remove
    /// nothing.
    pub fn remove(&mut self, amount: f64) -> f64 {
        let removed = amount.min(self.volume).max(0.0);
        self.volume -= removed;
        removed
    }

    /// Whether the tank is empty for flow purposes (`volume <= epsilon`).
    pub fn is_empty(&self) -> bool {
        self.volume <= self.level_epsilon
    }

    /// Whether the tank is full for flow purposes
    /// (`volume >= capacity - epsilon`).
    pub fn is_full(&self) -> bool {
        self.volume >= self.capacity - self.level_epsilon
    }

    /// Fill ratio in `[0, 1]`, computed as `volume / capacity`.
    pub fn fill_ratio(&self) -> f64 {
        self.volume / self.capacity
    }

    /// Current volume in absolute units.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Fixed capacity in absolute units.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Manual override: set the volume to exactly the capacity,
    /// bypassing the `add` clamping path. Idempotent.
    pub fn set_full(&mut self) {
        self.volume = self.capacity;
    }

    /// Manual override: set the volume to exactly zero, bypassing the
    /// `remove` clamping path. Idempotent.
    pub fn set_empty(&mut self) {
        self.volume = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_tank() -> Tank {
        Tank::new(100.0, 0.1)
    }

    #[test]
    fn new_tank_is_empty() {
        let tank = reference_tank();
        assert_eq!(tank.volume(), 0.0);
        assert_eq!(tank.fill_ratio(), 0.0);
        assert!(tank.is_empty());
        assert!(!tank.is_full());
    }

    #[test]
    fn add_clamps_to_headroom_and_returns_actual() {
        let mut tank = reference_tank();
        assert_eq!(tank.add(60.0), 60.0);
        assert_eq!(tank.add(60.0), 40.0);
        assert_eq!(tank.volume(), 100.0);
        assert!(tank.is_full());
    }

    #[test]
    fn remove_clamps_to_volume_and_returns_actual() {
        let mut tank = reference_tank();
        tank.add(10.0);
        assert_eq!(tank.remove(4.0), 4.0);
        assert_eq!(tank.remove(100.0), 6.0);
        assert_eq!(tank.volume(), 0.0);
    }

    #[test]
    fn negative_requests_move_nothing() {
        let mut tank = reference_tank();
        tank.add(50.0);
        assert_eq!(tank.add(-5.0), 0.0);
        assert_eq!(tank.remove(-5.0), 0.0);
        assert_eq!(tank.volume(), 50.0);
    }

    #[test]
    fn epsilon_governs_empty_and_full() {
        let mut tank = reference_tank();
        tank.add(0.1);
        assert!(tank.is_empty(), "residue at epsilon still counts as empty");
        tank.add(0.05);
        assert!(!tank.is_empty());

        tank.set_empty();
        tank.add(99.9);
        assert!(tank.is_full(), "within epsilon of capacity counts as full");
        tank.remove(0.05);
        assert!(!tank.is_full());
    }

    #[test]
    fn overrides_are_idempotent() {
        let mut tank = reference_tank();
        tank.set_full();
        tank.set_full();
        assert_eq!(tank.volume(), 100.0);
        tank.set_empty();
        tank.set_empty();
        assert_eq!(tank.volume(), 0.0);
    }

    #[test]
    fn fill_ratio_tracks_volume() {
        let mut tank = reference_tank();
        tank.add(25.0);
        assert!((tank.fill_ratio() - 0.25).abs() < 1e-12);
        tank.add(25.0);
        assert!((tank.fill_ratio() - 0.5).abs() < 1e-12);
    }

    proptest! {
        /// Volume stays in [0, capacity] and the ratio stays consistent
        /// under arbitrary interleavings of add/remove/override.
        #[test]
        fn volume_invariant_under_random_ops(
            ops in prop::collection::vec((0u8..4, 0.0f64..250.0), 0..64)
        ) {
            let mut tank = reference_tank();
            for (op, amount) in ops {
                match op {
                    0 => { tank.add(amount); }
                    1 => { tank.remove(amount); }
                    2 => tank.set_full(),
                    _ => tank.set_empty(),
                }
                prop_assert!(tank.volume() >= 0.0);
                prop_assert!(tank.volume() <= tank.capacity());
                let expected = tank.volume() / tank.capacity();
                prop_assert!((tank.fill_ratio() - expected).abs() < 1e-12);
            }
        }

        /// `add` reports exactly the volume delta it produced.
        #[test]
        fn add_return_matches_delta(
            initial in 0.0f64..100.0,
            amount in 0.0f64..200.0
        ) {
            let mut tank = reference_tank();
            tank.add(initial);
            let before = tank.volume();
            let added = tank.add(amount);
            prop_assert!((tank.volume() - before - added).abs() < 1e-9);
            prop_assert!(added <= amount + 1e-12);
        }

        /// `remove` reports exactly the volume delta it produced.
        #[test]
        fn remove_return_matches_delta(
            initial in 0.0f64..100.0,
            amount in 0.0f64..200.0
        ) {
            let mut tank = reference_tank();
            tank.add(initial);
            let before = tank.volume();
            let removed = tank.remove(amount);
            prop_assert!((before - tank.volume() - removed).abs() < 1e-9);
            prop_assert!(removed <= amount + 1e-12);
        }
    }
}
