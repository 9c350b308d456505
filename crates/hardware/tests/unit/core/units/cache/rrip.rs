//! RRIP Replacement Policy Tests.
//!
//! Verifies victim selection, aging, set-dueling leader classification, PSEL
//! saturation and insertion for the RRIP policy. The BRRIP draw is pinned
//! with a fixed source so every outcome is deterministic.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use replsim_core::CacheSim;
use replsim_core::config::{CacheConfig, ReplacementPolicy as PolicyType, RripConfig};
use replsim_core::core::units::cache::block::Block;
use replsim_core::core::units::cache::policies::{
    Insertion, InsertionRng, ReplacementPolicy, RripPolicy, RrpvConstants, SetRole,
};

/// Draw source that always returns the same value.
struct FixedDraw(u32);

impl InsertionRng for FixedDraw {
    fn draw(&mut self, bound: u32) -> u32 {
        self.0 % bound
    }
}

/// First SRRIP leader (offset 0, constituency 0).
const SRRIP_LEADER: usize = 0;
/// First BRRIP leader (complemented offset 0, constituency 0).
const BRRIP_LEADER: usize = 31;
/// Neither predicate holds.
const FOLLOWER: usize = 1;

fn policy(psel_init: u32, draw: u32) -> RripPolicy {
    let config = RripConfig {
        psel_init,
        ..RripConfig::default()
    };
    match RripPolicy::with_rng(&config, Box::new(FixedDraw(draw))) {
        Ok(p) => p,
        Err(e) => panic!("default RRIP config rejected: {e}"),
    }
}

/// A full set whose ways hold `counters`.
fn full_set(counters: &[u32]) -> Vec<Block> {
    counters
        .iter()
        .enumerate()
        .map(|(i, &counter)| Block {
            tag: 0x100 + i as u64,
            valid: true,
            counter,
        })
        .collect()
}

fn counters(set: &[Block]) -> Vec<u32> {
    set.iter().map(|b| b.counter).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Constants
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(2, 0, 2, 3)]
#[case(3, 0, 6, 7)]
#[case(4, 0, 14, 15)]
fn rrpv_constants_follow_counter_width(
    #[case] bits: u32,
    #[case] near_imm: u32,
    #[case] distant: u32,
    #[case] long: u32,
) {
    assert_eq!(
        RrpvConstants::from_bits(bits),
        RrpvConstants {
            near_imm,
            distant,
            long
        }
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(32)]
#[should_panic(expected = "RRPV counter width out of range")]
fn rrpv_constants_reject_unusable_width(#[case] bits: u32) {
    let _ = RrpvConstants::from_bits(bits);
}

#[rstest]
#[case(RripConfig { counter_bits: 1, ..RripConfig::default() })]
#[case(RripConfig { counter_bits: 17, ..RripConfig::default() })]
#[case(RripConfig { leader_bits: 0, ..RripConfig::default() })]
#[case(RripConfig { psel_init: 1024, ..RripConfig::default() })]
fn out_of_range_parameters_are_rejected(#[case] config: RripConfig) {
    assert!(RripPolicy::new(&config).is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Invalid-way fast path
// ══════════════════════════════════════════════════════════

/// The new line's RRPV goes to the invalid way that is returned, never to
/// the way the max scan had reached. Way 1 holds the running maximum when
/// the scan meets the invalid way 2; a fill that wrote the scan index would
/// clobber way 1 instead.
#[test]
fn fast_path_writes_the_selected_invalid_way_not_the_scan_index() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[1, 3, 0, 0]);
    set[2].valid = false;
    set[3].valid = false;

    let way = p.choose_victim(&mut set, FOLLOWER);

    assert_eq!(way, 2);
    assert_eq!(counters(&set), vec![1, 3, p.rrpv().long, 0]);
}

#[test]
fn fast_path_takes_leftmost_invalid_way_without_aging() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[0, 1, 2, 2]);
    set[1].valid = false;
    set[3].valid = false;

    assert_eq!(p.choose_victim(&mut set, FOLLOWER), 1);
    assert_eq!(counters(&set), vec![0, 3, 2, 2]);
}

#[test]
fn fast_path_leaves_psel_alone() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[0, 0, 0, 0]);
    set[0].valid = false;

    assert_eq!(p.choose_victim(&mut set, BRRIP_LEADER), 0);
    assert_eq!(p.psel(), 0);
    assert!(p.pending_miss());
}

// ══════════════════════════════════════════════════════════
// 3. Victim search and aging
// ══════════════════════════════════════════════════════════

/// Ties on the maximum RRPV go to the leftmost way.
#[test]
fn victim_is_leftmost_maximum() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[1, 3, 3, 0]);

    assert_eq!(p.choose_victim(&mut set, FOLLOWER), 1);
}

/// A maximum above the distant value ages the set downwards, saturating at 0.
#[test]
fn aging_lowers_set_when_max_is_long() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[1, 3, 3, 0]);

    let way = p.choose_victim(&mut set, FOLLOWER);

    // delta = 2 - 3 = -1; follower with PSEL 0 inserts with SRRIP (distant).
    assert_eq!(way, 1);
    assert_eq!(counters(&set), vec![0, 2, 2, 0]);
}

/// A maximum below the distant value ages the set upwards.
#[test]
fn aging_raises_set_until_max_is_distant() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[0, 1, 0, 1]);

    let way = p.choose_victim(&mut set, FOLLOWER);

    assert_eq!(way, 1);
    assert_eq!(counters(&set), vec![1, 2, 1, 2]);
}

#[test]
fn all_zero_set_evicts_way_zero() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[0, 0, 0, 0]);

    assert_eq!(p.choose_victim(&mut set, FOLLOWER), 0);
    assert_eq!(counters(&set), vec![2, 2, 2, 2]);
}

#[test]
#[should_panic(expected = "RRIP victim search found no way")]
fn empty_set_is_fatal() {
    let mut p = policy(0, 5);
    let _way = p.choose_victim(&mut [], FOLLOWER);
}

// ══════════════════════════════════════════════════════════
// 4. Set-dueling
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, SetRole::SrripLeader)]
#[case(33, SetRole::SrripLeader)]
#[case(1023, SetRole::SrripLeader)]
#[case(31, SetRole::BrripLeader)]
#[case(62, SetRole::BrripLeader)]
#[case(992, SetRole::BrripLeader)]
#[case(1, SetRole::Follower)]
#[case(32, SetRole::Follower)]
fn leader_classification(#[case] set_index: usize, #[case] role: SetRole) {
    assert_eq!(policy(0, 0).set_role(set_index), role);
}

/// With 5-bit fields every 1024-set window holds 32 leaders of each kind.
#[test]
fn leader_groups_have_32_sets_each() {
    let p = policy(0, 0);
    let srrip = (0..1024).filter(|&s| p.is_srrip_leader(s)).count();
    let brrip = (0..1024).filter(|&s| p.is_brrip_leader(s)).count();
    assert_eq!((srrip, brrip), (32, 32));
}

proptest! {
    #[test]
    fn leader_predicates_are_disjoint(set_index in 0usize..1 << 20, bits in 1u32..=10) {
        let config = RripConfig { leader_bits: bits, ..RripConfig::default() };
        let p = RripPolicy::new(&config).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(!(p.is_srrip_leader(set_index) && p.is_brrip_leader(set_index)));
    }
}

fn drive_misses(p: &mut RripPolicy, set_index: usize, n: usize) {
    let mut set = full_set(&[0, 1, 2, 3]);
    for _ in 0..n {
        let way = p.choose_victim(&mut set, set_index);
        p.on_access(&mut set, set_index, way, false);
    }
}

#[test]
fn psel_stops_at_511_under_brrip_leader_misses() {
    let mut p = policy(0, 5);
    drive_misses(&mut p, BRRIP_LEADER, 2000);
    assert_eq!(p.psel(), 511);
}

#[test]
fn psel_stops_at_512_under_srrip_leader_misses() {
    let mut p = policy(1023, 5);
    drive_misses(&mut p, SRRIP_LEADER, 2000);
    assert_eq!(p.psel(), 512);
}

#[test]
fn psel_does_not_wrap_below_zero() {
    let mut p = policy(0, 5);
    drive_misses(&mut p, SRRIP_LEADER, 10);
    assert_eq!(p.psel(), 0);
}

#[test]
fn psel_does_not_wrap_above_1023() {
    let mut p = policy(1023, 5);
    drive_misses(&mut p, BRRIP_LEADER, 10);
    assert_eq!(p.psel(), 1023);
}

#[test]
fn followers_never_move_psel() {
    let mut p = policy(300, 5);
    drive_misses(&mut p, FOLLOWER, 100);
    assert_eq!(p.psel(), 300);
}

#[test]
fn leader_miss_moves_psel_by_one() {
    let mut p = policy(100, 5);
    drive_misses(&mut p, BRRIP_LEADER, 1);
    assert_eq!(p.psel(), 101);
    drive_misses(&mut p, SRRIP_LEADER, 3);
    assert_eq!(p.psel(), 98);
}

#[rstest]
#[case(0, Insertion::Srrip)]
#[case(511, Insertion::Srrip)]
#[case(512, Insertion::Brrip)]
#[case(1023, Insertion::Brrip)]
fn followers_take_insertion_from_psel_msb(#[case] psel: u32, #[case] insertion: Insertion) {
    let p = policy(psel, 0);
    assert_eq!(p.insertion_for(SetRole::Follower), insertion);
    assert_eq!(p.insertion_for(SetRole::SrripLeader), Insertion::Srrip);
    assert_eq!(p.insertion_for(SetRole::BrripLeader), Insertion::Brrip);
}

// ══════════════════════════════════════════════════════════
// 5. Insertion
// ══════════════════════════════════════════════════════════

#[test]
fn brrip_draw_of_zero_inserts_distant() {
    let mut p = policy(0, 0);
    let mut set = full_set(&[0, 1, 2, 3]);

    let way = p.choose_victim(&mut set, BRRIP_LEADER);

    assert_eq!(way, 3);
    assert_eq!(set[way].counter, p.rrpv().distant);
}

#[rstest]
fn brrip_nonzero_draw_inserts_long(#[values(1, 2, 16, 30, 31)] draw: u32) {
    let mut p = policy(0, draw);
    let mut set = full_set(&[0, 1, 2, 3]);

    let way = p.choose_victim(&mut set, BRRIP_LEADER);

    assert_eq!(set[way].counter, p.rrpv().long);
}

#[rstest]
fn srrip_leader_always_inserts_distant(#[values(0, 1, 31)] draw: u32) {
    let mut p = policy(1023, draw);
    let mut set = full_set(&[3, 1, 2, 0]);

    let way = p.choose_victim(&mut set, SRRIP_LEADER);

    assert_eq!(way, 0);
    assert_eq!(set[way].counter, p.rrpv().distant);
}

#[test]
fn follower_uses_brrip_when_psel_msb_set() {
    let mut p = policy(512, 7);
    let mut set = full_set(&[0, 1, 2, 3]);

    let way = p.choose_victim(&mut set, FOLLOWER);

    assert_eq!(set[way].counter, p.rrpv().long);
}

// ══════════════════════════════════════════════════════════
// 6. Access updates
// ══════════════════════════════════════════════════════════

/// Miss updates leave the insertion RRPV in place and clear the pending flag.
#[test]
fn miss_update_keeps_insertion_rrpv() {
    let mut p = policy(0, 9);
    let mut set = full_set(&[0, 1, 2, 3]);

    let way = p.choose_victim(&mut set, BRRIP_LEADER);
    let inserted = counters(&set);
    p.on_access(&mut set, BRRIP_LEADER, way, false);

    assert_eq!(counters(&set), inserted);
    assert!(!p.pending_miss());
}

#[test]
fn repeated_hits_hold_near_immediate_and_leave_others() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[3, 2, 1, 2]);

    for _ in 0..5 {
        p.on_access(&mut set, FOLLOWER, 1, true);
        assert_eq!(counters(&set), vec![3, 0, 1, 2]);
    }
}

#[test]
fn hit_after_miss_pair_promotes() {
    let mut p = policy(0, 5);
    let mut set = full_set(&[0, 1, 2, 3]);

    let way = p.choose_victim(&mut set, FOLLOWER);
    p.on_access(&mut set, FOLLOWER, way, false);
    p.on_access(&mut set, FOLLOWER, way, true);

    assert_eq!(set[way].counter, 0);
}

// ══════════════════════════════════════════════════════════
// 7. Properties through the cache
// ══════════════════════════════════════════════════════════

fn rrip_cache(counter_bits: u32, seed: u64) -> CacheSim {
    let config = CacheConfig {
        size_bytes: 64 * 4 * 64,
        line_bytes: 64,
        ways: 4,
        policy: PolicyType::RripDueling,
        rrip: RripConfig {
            counter_bits,
            seed,
            ..RripConfig::default()
        },
    };
    match CacheSim::new(&config) {
        Ok(c) => c,
        Err(e) => panic!("test cache rejected: {e}"),
    }
}

proptest! {
    #[test]
    fn counters_stay_within_rrpv_range(
        lines in proptest::collection::vec(0u64..1024, 1..400),
        bits in 2u32..=4,
        seed in any::<u64>(),
    ) {
        let mut cache = rrip_cache(bits, seed);
        let long = RrpvConstants::from_bits(bits).long;
        for line in lines {
            let _hit = cache.access(line * 64);
            let set = cache.blocks().set(cache.set_index(line * 64));
            prop_assert!(set.iter().all(|b| b.counter <= long));
        }
    }

    #[test]
    fn equal_seeds_replay_identically(
        lines in proptest::collection::vec(0u64..512, 1..300),
        seed in any::<u64>(),
    ) {
        let mut a = rrip_cache(2, seed);
        let mut b = rrip_cache(2, seed);
        for line in lines {
            prop_assert_eq!(a.access(line * 64), b.access(line * 64));
        }
        for s in 0..a.blocks().num_sets() {
            prop_assert_eq!(a.blocks().set(s), b.blocks().set(s));
        }
    }
}
