use proptest::prelude::*;
use tessera_renderstate::{MapTileState, TileInfo, TileInfoRegion, TileState};

fn tile_state() -> impl Strategy<Value = TileState> {
    prop::sample::select(TileState::ALL.to_vec())
}

fn tile_info() -> impl Strategy<Value = TileInfo> {
    (0i32..1_000_000, tile_state()).prop_map(|(t, s)| TileInfo::new(t, s))
}

proptest! {
    #[test]
    fn set_then_get(x in any::<i32>(), z in any::<i32>(), info in tile_info()) {
        let mut r = TileInfoRegion::create();
        r.set(x, z, info);
        prop_assert_eq!(r.get(x, z), info);
        // Wrapping: the same slot one region over.
        prop_assert_eq!(r.get(x.wrapping_add(32), z.wrapping_sub(32)), info);
    }

    #[test]
    fn latest_is_max_of_writes(writes in prop::collection::vec((0i32..32, 0i32..32, tile_info()), 1..50)) {
        let mut r = TileInfoRegion::create();
        for (x, z, info) in &writes {
            r.set(*x, *z, *info);
        }
        let mut expected = 0;
        for x in 0..32 {
            for z in 0..32 {
                expected = expected.max(r.get(x, z).render_time);
            }
        }
        prop_assert_eq!(r.find_latest_render_time(), expected);
    }

    #[test]
    fn summary_totals_match_region_count(writes in prop::collection::vec((-200i32..200, -200i32..200, tile_info()), 0..40)) {
        let mut m = MapTileState::new();
        for (x, z, info) in &writes {
            m.set(*x, *z, *info);
        }
        let total: u32 = m.summary().values().sum();
        prop_assert_eq!(total as usize, m.region_count() * tessera_renderstate::TILES_PER_REGION);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn every_slot_survives_toml(slots in prop::collection::vec(tile_info(), tessera_renderstate::TILES_PER_REGION)) {
        let mut r = TileInfoRegion::create();
        for (i, info) in slots.iter().enumerate() {
            r.set((i % 32) as i32, (i / 32) as i32, *info);
        }
        let text = toml::to_string(&r).unwrap();
        let back: TileInfoRegion = toml::from_str(&text).unwrap();
        for (i, info) in slots.iter().enumerate() {
            prop_assert_eq!(back.get((i % 32) as i32, (i / 32) as i32), *info);
        }
        prop_assert_eq!(back.find_latest_render_time(), r.find_latest_render_time());
    }
}
