use proptest::prelude::*;
use tessera_blocks::BlockState;
use tessera_world::VoxelGrid;

proptest! {
    #[test]
    fn set_then_get_inside_bounds(
        min in (-50i32..50, -50i32..50, -50i32..50),
        dims in (1usize..6, 1usize..6, 1usize..6),
        off in (0usize..6, 0usize..6, 0usize..6),
    ) {
        let (sx, sy, sz) = dims;
        let mut g = VoxelGrid::new(min, sx, sy, sz);
        let (wx, wy, wz) = (min.0 + off.0 as i32, min.1 + off.1 as i32, min.2 + off.2 as i32);
        let stone = BlockState::new("stone");
        g.set_block(wx, wy, wz, &stone);
        let inside = off.0 < sx && off.1 < sy && off.2 < sz;
        prop_assert_eq!(g.contains(wx, wy, wz), inside);
        if inside {
            prop_assert_eq!(g.block(wx, wy, wz), &stone);
        } else {
            prop_assert!(g.block(wx, wy, wz).is_air());
        }
    }

    #[test]
    fn sky_light_never_exceeds_max(
        heights in prop::collection::vec(0usize..8, 16),
    ) {
        let mut g = VoxelGrid::new((0, 0, 0), 4, 8, 4);
        for (i, h) in heights.iter().enumerate() {
            for y in 0..*h {
                g.set_block((i % 4) as i32, y as i32, (i / 4) as i32, &BlockState::new("stone"));
            }
        }
        g.compute_sky_light();
        for z in 0..4 {
            for y in 0..8 {
                for x in 0..4 {
                    let e = g.extended(x, y, z);
                    prop_assert!(e.sky_light <= 15);
                    if !e.state.is_air() {
                        prop_assert_eq!(e.sky_light, 0);
                    }
                }
            }
        }
    }
}
