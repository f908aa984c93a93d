//! Property-based tests using `proptest` for pool accounting invariants.
//!
//! 1. **Share conservation**: holder balances always sum to the supply.
//! 2. **Invariant growth**: `reserve_a · reserve_b` never falls across a mint.
//! 3. **Sync idempotence**: a second `sync` changes nothing.
//! 4. **Proportional burn**: payouts are the exact floor of the share slice.
//! 5. **Router sizing**: deposits never exceed the desired amounts.

use proptest::prelude::*;

use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, AssetPair, Liquidity};
use crate::ledger::InMemoryLedger;
use crate::math::wide_mul;
use crate::pools::Exchange;
use crate::router::optimal_deposit;
use crate::traits::{AssetLedger, FromConfig};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const FEE_OFF: Option<Address> = None;

fn asset_a() -> Address {
    Address::from_bytes([1u8; 32])
}

fn asset_b() -> Address {
    Address::from_bytes([2u8; 32])
}

fn holder(i: u8) -> Address {
    Address::from_bytes([0x40 + i; 32])
}

fn fee_sink() -> Address {
    Address::from_bytes([0x30u8; 32])
}

fn make_pool() -> Exchange {
    let Ok(pair) = AssetPair::new(asset_a(), asset_b()) else {
        panic!("valid pair");
    };
    let Ok(pool) = Exchange::from_config(&ExchangeConfig::new(pair)) else {
        panic!("valid pool");
    };
    pool
}

fn send(ledger: &InMemoryLedger, pool: &Exchange, a: u128, b: u128) {
    if a > 0 {
        let Ok(()) = ledger.mint(asset_a(), pool.address(), Amount::new(a)) else {
            panic!("fund a");
        };
    }
    if b > 0 {
        let Ok(()) = ledger.mint(asset_b(), pool.address(), Amount::new(b)) else {
            panic!("fund b");
        };
    }
}

fn seeded(ra: u128, rb: u128, fees: &Option<Address>) -> (InMemoryLedger, Exchange) {
    let ledger = InMemoryLedger::new();
    let pool = make_pool();
    send(&ledger, &pool, ra, rb);
    let Ok(_) = pool.mint(&ledger, fees, holder(0)) else {
        panic!("seed mint");
    };
    (ledger, pool)
}

fn product(pool: &Exchange) -> alloy_primitives::U256 {
    let (ra, rb) = pool.get_reserves();
    wide_mul(ra.get(), rb.get())
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves between 1e6 and 1e24 units so the first deposit clears the
/// locked minimum and products stay well inside 256 bits.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000_000_000_000u128
}

/// Deposit legs, including zero.
fn leg_strategy() -> impl Strategy<Value = u128> {
    0u128..=1_000_000_000_000_000_000_000u128
}

/// Operations applied to a seeded pool.
#[derive(Debug, Clone)]
enum Op {
    Deposit { who: u8, a: u128, b: u128 },
    Withdraw { who: u8, per_mille: u16 },
    Donate { a: u128, b: u128 },
    Sync,
    Move { from: u8, to: u8, per_mille: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, leg_strategy(), leg_strategy()).prop_map(|(who, a, b)| Op::Deposit { who, a, b }),
        (0u8..4, 1u16..=1_000).prop_map(|(who, per_mille)| Op::Withdraw { who, per_mille }),
        (leg_strategy(), leg_strategy()).prop_map(|(a, b)| Op::Donate { a, b }),
        Just(Op::Sync),
        (0u8..4, 0u8..4, 1u16..=1_000).prop_map(|(from, to, per_mille)| Op::Move {
            from,
            to,
            per_mille
        }),
    ]
}

fn slice(shares: Liquidity, per_mille: u16) -> Liquidity {
    Liquidity::new(shares.get() / 1_000 * u128::from(per_mille))
}

// ---------------------------------------------------------------------------
// Property 1: Share Conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_share_balances_sum_to_supply(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fee_on in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 1..24),
    ) {
        let fees = if fee_on { Some(fee_sink()) } else { FEE_OFF };
        let (ledger, pool) = seeded(ra, rb, &fees);

        for op in ops {
            match op {
                Op::Deposit { who, a, b } => {
                    send(&ledger, &pool, a, b);
                    // A rejected mint leaves the transfer behind as a donation.
                    let _ = pool.mint(&ledger, &fees, holder(who));
                }
                Op::Withdraw { who, per_mille } => {
                    let shares = slice(pool.share_balance_of(&holder(who)), per_mille);
                    if shares.is_zero() { continue; }
                    let Ok(()) = pool.transfer_shares(holder(who), pool.address(), shares) else {
                        continue;
                    };
                    let _ = pool.burn(&ledger, &fees, holder(who));
                }
                Op::Donate { a, b } => send(&ledger, &pool, a, b),
                Op::Sync => {
                    let Ok(()) = pool.sync(&ledger) else {
                        panic!("sync on an unlocked pool");
                    };
                }
                Op::Move { from, to, per_mille } => {
                    let shares = slice(pool.share_balance_of(&holder(from)), per_mille);
                    let _ = pool.transfer_shares(holder(from), holder(to), shares);
                }
            }
            prop_assert_eq!(pool.sum_of_share_balances(), pool.total_shares().get());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Invariant Growth
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_mint_never_shrinks_product(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        a in leg_strategy(),
        b in leg_strategy(),
        fee_on in any::<bool>(),
    ) {
        let fees = if fee_on { Some(fee_sink()) } else { FEE_OFF };
        let (ledger, pool) = seeded(ra, rb, &fees);
        let k_before = product(&pool);

        send(&ledger, &pool, a, b);
        if pool.mint(&ledger, &fees, holder(1)).is_ok() {
            prop_assert!(product(&pool) >= k_before);
        } else {
            prop_assert_eq!(product(&pool), k_before);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Sync Idempotence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_second_sync_is_noop(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        a in leg_strategy(),
        b in leg_strategy(),
    ) {
        let (ledger, pool) = seeded(ra, rb, &FEE_OFF);
        send(&ledger, &pool, a, b);

        let Ok(()) = pool.sync(&ledger) else {
            panic!("first sync");
        };
        let reserves = pool.get_reserves();
        let k_last = pool.k_last();
        let supply = pool.total_shares();

        let Ok(()) = pool.sync(&ledger) else {
            panic!("second sync");
        };
        prop_assert_eq!(pool.get_reserves(), reserves);
        prop_assert_eq!(pool.k_last(), k_last);
        prop_assert_eq!(pool.total_shares(), supply);
    }
}

// ---------------------------------------------------------------------------
// Property 4: Proportional Burn
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_burn_pays_floor_of_share_slice(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        per_mille in 1u16..=1_000,
    ) {
        let (ledger, pool) = seeded(ra, rb, &FEE_OFF);
        let shares = slice(pool.share_balance_of(&holder(0)), per_mille);
        if shares.is_zero() { return Ok(()); }
        let supply = pool.total_shares().get();

        let Ok(()) = pool.transfer_shares(holder(0), pool.address(), shares) else {
            panic!("move shares");
        };
        let Ok((out_a, out_b)) = pool.burn(&ledger, &FEE_OFF, holder(0)) else {
            return Ok(());
        };

        let expect_a = wide_mul(shares.get(), ra) / alloy_primitives::U256::from(supply);
        let expect_b = wide_mul(shares.get(), rb) / alloy_primitives::U256::from(supply);
        prop_assert_eq!(out_a.widen(), expect_a);
        prop_assert_eq!(out_b.widen(), expect_b);
        prop_assert_eq!(pool.get_reserves(), (Amount::new(ra - out_a.get()), Amount::new(rb - out_b.get())));
    }
}

// ---------------------------------------------------------------------------
// Property 5: Router Sizing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_sized_deposit_within_desired(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        da in 1u128..=1_000_000_000_000_000_000_000u128,
        db in 1u128..=1_000_000_000_000_000_000_000u128,
    ) {
        let Ok((a, b)) = optimal_deposit(
            Amount::new(da),
            Amount::new(db),
            Amount::ZERO,
            Amount::ZERO,
            Amount::new(ra),
            Amount::new(rb),
        ) else {
            return Ok(());
        };
        prop_assert!(a.get() <= da);
        prop_assert!(b.get() <= db);
        // One leg is always taken in full.
        prop_assert!(a.get() == da || b.get() == db);
    }
}
