//! Converts a bid's discount rate and duration into a price and a ranking
//! score.
//!
//! The score is `daily_vc_price * 1.001^vc_number` in 1e18 fixed point with
//! `daily_vc_price = expected_daily_return * (10000 - rate) / 10000`. The
//! exponential duration weight makes the score strictly increasing in the
//! committed days and strictly decreasing in the discount rate, and two bids
//! only score equally when they agree on both parameters, so equal scores
//! are left entirely to the index tie-break.

use crate::{config::AuctionConfig, error::AuctionError, Result};
use primitive_types::{U256, U512};

const BPS_DENOMINATOR: u64 = 10_000;

/// 1e18, the fixed point scale.
const WAD: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1.001 in fixed point, the per-VC-day score growth factor.
const GROWTH_PER_VC: U256 = U256([1_001_000_000_000_000_000, 0, 0, 0]);

/// The price a node operator pays for a bid. Whitelisted operators are
/// exempt from the bond.
pub fn price_to_pay(
    config: &AuctionConfig,
    whitelisted: bool,
    discount_rate_bps: u16,
    vc_number: u32,
) -> Result<U256> {
    validate(config, discount_rate_bps, vc_number)?;
    let duration_cost = config
        .expected_daily_return()
        .checked_mul(U256::from(vc_number))
        .ok_or(AuctionError::NumericOverflow)?;
    let discounted = discount(duration_cost, discount_rate_bps)?;
    if whitelisted {
        Ok(discounted)
    } else {
        discounted
            .checked_add(config.provider_bond())
            .ok_or(AuctionError::NumericOverflow)
    }
}

/// The scalar ranking score of a bid. Does not depend on whitelist status.
pub fn auction_score(
    config: &AuctionConfig,
    discount_rate_bps: u16,
    vc_number: u32,
) -> Result<U256> {
    validate(config, discount_rate_bps, vc_number)?;
    let daily_vc_price = discount(config.expected_daily_return(), discount_rate_bps)?;
    let duration_weight = pow_wad(GROWTH_PER_VC, vc_number)?;
    mul_wad(daily_vc_price, duration_weight)
}

fn validate(config: &AuctionConfig, discount_rate_bps: u16, vc_number: u32) -> Result<()> {
    if discount_rate_bps > config.max_discount_rate_bps() {
        return Err(AuctionError::DiscountRateTooHigh {
            offered: discount_rate_bps,
            max: config.max_discount_rate_bps(),
        });
    }
    if vc_number < config.min_duration_days() {
        return Err(AuctionError::DurationTooShort {
            offered: vc_number,
            min: config.min_duration_days(),
        });
    }
    Ok(())
}

fn discount(amount: U256, rate_bps: u16) -> Result<U256> {
    let remaining = BPS_DENOMINATOR
        .checked_sub(rate_bps.into())
        .ok_or(AuctionError::NumericOverflow)?;
    Ok(amount
        .checked_mul(remaining.into())
        .ok_or(AuctionError::NumericOverflow)?
        / U256::from(BPS_DENOMINATOR))
}

/// `a * b / 1e18` with a 512 bit intermediate.
fn mul_wad(a: U256, b: U256) -> Result<U256> {
    let product = a.full_mul(b) / U512::from(WAD);
    U256::try_from(product).map_err(|_| AuctionError::NumericOverflow)
}

/// Fixed point exponentiation by squaring.
fn pow_wad(base: U256, mut exponent: u32) -> Result<U256> {
    let mut result = WAD;
    let mut base = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_wad(result, base)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = mul_wad(base, base)?;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::AuctionConfigValues;

    fn config() -> AuctionConfig {
        AuctionConfig::new(AuctionConfigValues::default())
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let config = config();
        assert_eq!(
            price_to_pay(&config, true, 1_501, 100),
            Err(AuctionError::DiscountRateTooHigh {
                offered: 1_501,
                max: 1_500
            })
        );
        assert_eq!(
            price_to_pay(&config, true, 500, 29),
            Err(AuctionError::DurationTooShort {
                offered: 29,
                min: 30
            })
        );
        assert!(auction_score(&config, 1_501, 100).is_err());
    }

    #[test]
    fn price_is_discounted_daily_return_over_duration() {
        let config = config();
        // 0.01 ether per day, 100 days, 5% discount.
        let price = price_to_pay(&config, true, 500, 100).unwrap();
        assert_eq!(price, U256::from(950_000_000_000_000_000u64));
    }

    #[test]
    fn bond_applies_only_to_non_whitelisted() {
        let config = config();
        let whitelisted = price_to_pay(&config, true, 500, 100).unwrap();
        let bonded = price_to_pay(&config, false, 500, 100).unwrap();
        assert_eq!(bonded, whitelisted + config.provider_bond());
    }

    #[test]
    fn price_is_monotonic() {
        let config = config();
        for vc in [30, 100, 365] {
            let mut last = price_to_pay(&config, true, 0, vc).unwrap();
            for rate in 1..=1_500 {
                let price = price_to_pay(&config, true, rate, vc).unwrap();
                assert!(price < last, "price not decreasing at rate {}", rate);
                last = price;
            }
        }
        for rate in [0, 500, 1_500] {
            let mut last = price_to_pay(&config, true, rate, 30).unwrap();
            for vc in 31..=400 {
                let price = price_to_pay(&config, true, rate, vc).unwrap();
                assert!(price > last, "price not increasing at {} days", vc);
                last = price;
            }
        }
    }

    #[test]
    fn score_is_monotonic() {
        let config = config();
        for vc in [30, 100, 365] {
            let mut last = auction_score(&config, 0, vc).unwrap();
            for rate in 1..=1_500 {
                let score = auction_score(&config, rate, vc).unwrap();
                assert!(score < last, "score not decreasing at rate {}", rate);
                last = score;
            }
        }
        for rate in [0, 500, 1_500] {
            let mut last = auction_score(&config, rate, 30).unwrap();
            for vc in 31..=400 {
                let score = auction_score(&config, rate, vc).unwrap();
                assert!(score > last, "score not increasing at {} days", vc);
                last = score;
            }
        }
    }

    #[test]
    fn pow_wad_matches_known_values() {
        assert_eq!(pow_wad(WAD, 1_000).unwrap(), WAD);
        assert_eq!(pow_wad(GROWTH_PER_VC, 0).unwrap(), WAD);
        assert_eq!(pow_wad(GROWTH_PER_VC, 1).unwrap(), GROWTH_PER_VC);
        // 1.001^2 = 1.002001
        assert_eq!(
            pow_wad(GROWTH_PER_VC, 2).unwrap(),
            U256::from(1_002_001_000_000_000_000u64)
        );
    }
}
