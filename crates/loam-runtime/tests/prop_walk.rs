use loam_blocks::BlockCatalog;
use loam_edit::EditStore;
use loam_runtime::{ChunkCoordinator, Progress, StepBudget};
use loam_world::WorldConfig;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    // Walking the viewpoint around arbitrarily never breaks the streaming
    // invariants: origins stay grid-aligned, the ring keeps its size, and
    // every completed pass leaves every chunk meshed.
    #[test]
    fn random_walks_keep_the_ring_consistent(
        steps in prop::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 1..5),
    ) {
        let cfg = WorldConfig::default();
        let mut coord = ChunkCoordinator::new(cfg, BlockCatalog::builtin());
        let store = EditStore::new();

        let (mut x, mut z) = (0.0f32, 0.0f32);
        coord.update_center([x, 45.0, z], &store);
        coord.run_pass();

        for (dx, dz) in steps {
            x += dx;
            z += dz;
            if coord.update_center([x, 45.0, z], &store) {
                // interleave a few throttled slices before finishing
                for _ in 0..10 {
                    if coord.step(StepBudget::default()) != Progress::Working {
                        break;
                    }
                }
                coord.run_pass();
            }

            prop_assert_eq!(coord.chunks().count(), 25);
            for chunk in coord.chunks() {
                prop_assert_eq!(chunk.origin().x.rem_euclid(15), 0);
                prop_assert_eq!(chunk.origin().z.rem_euclid(15), 0);
                prop_assert_eq!(chunk.origin().y, 0);
                prop_assert!(chunk.mesh_ready());
            }
            prop_assert!(!coord.pass_in_flight());
        }
    }
}
