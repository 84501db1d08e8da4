use loam_blocks::BlockKind;
use loam_edit::EditStore;
use loam_io::{encode_store, parse_store};
use loam_world::BlockPos;
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = BlockKind> {
    (0u8..=5).prop_map(|c| BlockKind::from_code(c).unwrap())
}

fn edit() -> impl Strategy<Value = (BlockPos, BlockKind)> {
    ((-200i32..200, -50i32..100, -200i32..200), kind())
        .prop_map(|((x, y, z), k)| (BlockPos::new(x, y, z), k))
}

fn store() -> impl Strategy<Value = EditStore> {
    (
        [-1000.0f32..1000.0, -100.0f32..100.0, -1000.0f32..1000.0],
        prop::collection::vec(
            ((-20i32..=20, -20i32..=20), prop::collection::vec(edit(), 0..8)),
            0..6,
        ),
    )
        .prop_map(|(player, chunks)| {
            let mut store = EditStore::new();
            store.set_player_position(player);
            for ((cx, cz), edits) in chunks {
                let origin = BlockPos::new(cx * 15, 0, cz * 15);
                for (pos, kind) in edits {
                    store.record_edit(origin, pos, kind);
                }
            }
            store
        })
}

proptest! {
    #[test]
    fn round_trip_is_lossless(store in store()) {
        let decoded = parse_store(&encode_store(&store)).unwrap();
        prop_assert_eq!(decoded.player_position(), store.player_position());
        prop_assert_eq!(decoded.origins(), store.origins());
        for origin in store.origins() {
            let mut want = store.edits_for(origin);
            let mut got = decoded.edits_for(origin);
            want.sort_by_key(|(p, _)| *p);
            got.sort_by_key(|(p, _)| *p);
            prop_assert_eq!(got, want);
        }
    }

    // Re-encoding a decoded store reproduces the same bytes: the sorted
    // writer makes the text a canonical form.
    #[test]
    fn encoding_is_canonical(store in store()) {
        let text = encode_store(&store);
        let again = encode_store(&parse_store(&text).unwrap());
        prop_assert_eq!(text, again);
    }
}
