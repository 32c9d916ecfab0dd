//! Automatic white balance from zone statistics.
//!
//! Uses the gray-world assumption: the channel sums of a well-exposed scene
//! should be equal. The red and blue gains that equalise them against green
//! are combined with the gains the sensor already applies and returned as
//! balance codes.

use crate::color_management::white_balance::{balance_to_gain, gain_to_balance};

/// Red and blue balance codes that neutralise the measured channel sums.
///
/// `sensor_red_balance` / `sensor_blue_balance` are the balances in effect
/// while the statistics were collected. A channel with a zero sum keeps its
/// sensor balance.
pub fn balances_from_statistics(
    sum_r: u64,
    sum_g: u64,
    sum_b: u64,
    sensor_red_balance: i32,
    sensor_blue_balance: i32,
) -> (i32, i32) {
    let balance = |sum: u64, sensor: i32| {
        if sum == 0 {
            return sensor;
        }
        let gain = sum_g as f64 / sum as f64 * balance_to_gain(sensor);
        gain_to_balance(gain)
    };

    (
        balance(sum_r, sensor_red_balance),
        balance(sum_b, sensor_blue_balance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_scene_keeps_sensor_balance() {
        assert_eq!(balances_from_statistics(500, 500, 500, 0, 0), (0, 0));
        assert_eq!(balances_from_statistics(500, 500, 500, 20, -15), (20, -15));
    }

    #[test]
    fn test_warm_scene_reduces_red_and_boosts_blue() {
        let (rb, bb) = balances_from_statistics(900, 600, 300, 0, 0);
        assert!(rb < 0, "red balance should drop: {rb}");
        assert!(bb > 0, "blue balance should rise: {bb}");
        // Blue gain is G/B = 2 → balance round(2/3·256 − 128) = 43.
        assert_eq!(bb, 43);
    }

    #[test]
    fn test_empty_channel_keeps_sensor_balance() {
        assert_eq!(balances_from_statistics(0, 100, 0, 7, -3), (7, -3));
    }
}
