// ── Gateway selection ──
//
// Draw a random last octet in [low, high] until the candidate differs from
// the current gateway. Only collisions spend the attempt budget.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Subnet;
use crate::error::CoreError;

/// Uniform integer source over an inclusive range.
pub trait OctetSource {
    fn draw(&mut self, low: u8, high: u8) -> u8;
}

/// [`OctetSource`] backed by any `rand` RNG.
#[derive(Debug)]
pub struct RandomOctets<R>(R);

impl<R: Rng> RandomOctets<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> OctetSource for RandomOctets<R> {
    fn draw(&mut self, low: u8, high: u8) -> u8 {
        self.0.gen_range(low..=high)
    }
}

/// Gateway values for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayState {
    pub current: String,
    pub current_dns: Option<String>,
    pub new: String,
}

/// Pick a gateway in `<subnet>.<low>`-`<subnet>.<high>` distinct from `current`.
///
/// Aborts with [`CoreError::GatewayExhausted`] once the number of collisions
/// exceeds `max_attempts`.
pub fn select_gateway<S: OctetSource + ?Sized>(
    source: &mut S,
    subnet: &Subnet,
    (low, high): (u8, u8),
    current: &str,
    max_attempts: u32,
) -> Result<String, CoreError> {
    let mut collisions: u32 = 0;
    loop {
        let candidate = subnet.host(source.draw(low, high));
        if candidate != current {
            info!(new = %candidate, current, collisions, "selected new gateway");
            return Ok(candidate);
        }
        collisions += 1;
        debug!(candidate = %candidate, collisions, "candidate equals current gateway, redrawing");
        if collisions > max_attempts {
            return Err(CoreError::GatewayExhausted {
                attempts: collisions,
                current: current.to_owned(),
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::Subnet;

    /// Replays a fixed sequence of draws.
    struct Scripted {
        draws: VecDeque<u8>,
        calls: u32,
    }

    impl Scripted {
        fn new(draws: &[u8]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
                calls: 0,
            }
        }
    }

    impl OctetSource for Scripted {
        fn draw(&mut self, _low: u8, _high: u8) -> u8 {
            self.calls += 1;
            self.draws.pop_front().unwrap()
        }
    }

    fn subnet() -> Subnet {
        Subnet::new([10, 0, 5])
    }

    #[test]
    fn every_draw_stays_in_bounds_and_avoids_current() {
        let mut source = RandomOctets::new(StdRng::seed_from_u64(7));
        for _ in 0..2_000 {
            let new = select_gateway(&mut source, &subnet(), (50, 60), "10.0.5.55", 10).unwrap();
            let last: u8 = new.rsplit('.').next().unwrap().parse().unwrap();
            assert!((50..=60).contains(&last), "{new} out of range");
            assert_ne!(new, "10.0.5.55");
        }
    }

    #[test]
    fn narrowest_range_always_picks_the_other_value() {
        let mut source = RandomOctets::new(StdRng::seed_from_u64(1));
        for _ in 0..200 {
            let new = select_gateway(&mut source, &subnet(), (1, 2), "10.0.5.1", 50).unwrap();
            assert_eq!(new, "10.0.5.2");
        }
    }

    #[test]
    fn collisions_are_retried() {
        let mut source = Scripted::new(&[55, 55, 57]);
        let new = select_gateway(&mut source, &subnet(), (50, 60), "10.0.5.55", 2).unwrap();
        assert_eq!(new, "10.0.5.57");
        assert_eq!(source.calls, 3);
    }

    #[test]
    fn successful_draw_does_not_spend_budget() {
        let mut source = Scripted::new(&[55, 51]);
        let new = select_gateway(&mut source, &subnet(), (50, 60), "10.0.5.55", 1).unwrap();
        assert_eq!(new, "10.0.5.51");
    }

    #[test]
    fn exceeding_budget_aborts() {
        let mut source = Scripted::new(&[55; 4]);
        let err = select_gateway(&mut source, &subnet(), (50, 60), "10.0.5.55", 3).unwrap_err();
        assert!(matches!(err, CoreError::GatewayExhausted { attempts: 4, .. }));
        assert_eq!(source.calls, 4);
    }
}
