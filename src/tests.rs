#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::num::NonZero;
    use std::rc::Rc;

    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    use crate::anchor::Side;
    use crate::board::Grid;
    use crate::builder::{BuilderInvalidReason, GridBuilder};
    use crate::cell::Tile;
    use crate::config::GameConfig;
    use crate::error::Error;
    use crate::flow::evaluate;
    use crate::game::Game;
    use crate::generator::{
        blank_grid, carve_path, fill_decoys, generate_level, generate_level_with_solution, generate_with_carver, place_anchors,
        scramble, stamp_path,
    };
    use crate::location::Location;
    use crate::shape::{Direction, PipeShape};

    fn dims(rows: usize, cols: usize) -> (NonZero<usize>, NonZero<usize>) {
        (NonZero::new(rows).unwrap(), NonZero::new(cols).unwrap())
    }

    fn two_straights(top_rotation: u8) -> Grid {
        GridBuilder::with_dims(dims(2, 1))
            .set_tile(Location(0, 0), PipeShape::Straight, top_rotation)
            .set_tile(Location(1, 0), PipeShape::Straight, 0)
            .set_entry(Location(0, 0), Side::Top)
            .set_exit(Location(1, 0), Side::Bottom)
            .build()
            .unwrap()
    }

    #[rstest]
    fn four_turns_restore_connections(
        #[values(PipeShape::Straight, PipeShape::Elbow, PipeShape::Tee, PipeShape::Cross, PipeShape::Empty)] shape: PipeShape,
        #[values(0, 1, 2, 3)] rotation: u8,
    ) {
        let mut tile = Tile::new(Location(0, 0), shape);
        tile.set_rotation(rotation);
        let before = tile.current_connections();

        for _ in 0..4 {
            tile.rotate_once();
            assert!(tile.rotation() < 4);
        }

        assert_eq!(tile.rotation(), rotation);
        assert_eq!(tile.current_connections(), before);
    }

    #[rstest]
    fn connections_are_a_rotation_of_the_shape(
        #[values(PipeShape::Straight, PipeShape::Elbow, PipeShape::Tee, PipeShape::Cross, PipeShape::Empty)] shape: PipeShape,
        #[values(0, 1, 2, 3)] rotation: u8,
    ) {
        let mut tile = Tile::new(Location(0, 0), shape);
        tile.set_rotation(rotation);
        let live = tile.current_connections();

        assert!(live.bits() < 16);
        assert_eq!(live.len(), shape.connections().len());
        assert_eq!(live, shape.connections().rotated_cw(rotation));
        // turning back the rest of the way lands on the base shape
        assert_eq!(live.rotated_cw(4 - rotation), shape.connections());
    }

    #[test]
    fn straight_half_turn_is_equivalent() {
        let mut tile = Tile::new(Location(0, 0), PipeShape::Straight);
        let upright = tile.current_connections();
        tile.rotate_once();
        assert_eq!(tile.current_connections(), Direction::East | Direction::West);
        tile.rotate_once();
        assert_eq!(tile.current_connections(), upright);
    }

    #[test]
    fn tiles_are_identified_by_location() {
        let a = Tile::new(Location(0, 0), PipeShape::Tee);
        let b = Tile::new(Location(0, 1), PipeShape::Tee);
        let mut c = Tile::new(Location(0, 0), PipeShape::Cross);
        c.set_rotation(3);

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn two_straights_conduct_until_turned() {
        let mut grid = two_straights(0);

        let report = evaluate(&mut grid);
        assert!(report.won);
        assert_eq!(report.lit.len(), 2);
        assert!(report.lit.contains(&Location(0, 0)) && report.lit.contains(&Location(1, 0)));
        assert_eq!(grid.lit_map(), "#\n#\n");

        grid.rotate(0, 0);
        assert_eq!(grid.tile(Location(0, 0)).unwrap().rotation(), 1);
        assert_eq!(format!("{}", grid), "─\n│\n");

        let report = evaluate(&mut grid);
        assert!(!report.won);
        assert!(report.lit.is_empty());
        assert_eq!(grid.lit_map(), ".\n.\n");
    }

    #[test]
    fn flow_needs_connectors_on_both_sides() {
        let mut grid = GridBuilder::with_dims(dims(1, 3))
            .set_tile(Location(0, 0), PipeShape::Straight, 1)
            .set_tile(Location(0, 1), PipeShape::Elbow, 0)
            .set_tile(Location(0, 2), PipeShape::Straight, 1)
            .set_entry(Location(0, 0), Side::Left)
            .set_exit(Location(0, 2), Side::Right)
            .build()
            .unwrap();

        assert_eq!(format!("{}", grid), "─└─\n");
        let report = evaluate(&mut grid);
        assert!(!report.won);
        assert_eq!(grid.lit_map(), "#..\n");

        // a tee turned once faces east, south and west; its south connector hangs off the grid
        let mut grid = GridBuilder::with_dims(dims(1, 3))
            .set_tile(Location(0, 0), PipeShape::Straight, 1)
            .set_tile(Location(0, 1), PipeShape::Tee, 1)
            .set_tile(Location(0, 2), PipeShape::Straight, 1)
            .set_entry(Location(0, 0), Side::Left)
            .set_exit(Location(0, 2), Side::Right)
            .build()
            .unwrap();

        assert_eq!(format!("{}", grid), "─┬─\n");
        let report = evaluate(&mut grid);
        assert!(report.won);
        assert_eq!(grid.lit_map(), "###\n");
    }

    #[test]
    fn exit_must_face_off_the_grid() {
        // the exit tile is lit but points back west instead of out through the right edge
        let mut grid = GridBuilder::with_dims(dims(1, 2))
            .set_tile(Location(0, 0), PipeShape::Straight, 1)
            .set_tile(Location(0, 1), PipeShape::Elbow, 2)
            .set_entry(Location(0, 0), Side::Left)
            .set_exit(Location(0, 1), Side::Right)
            .build()
            .unwrap();

        let report = evaluate(&mut grid);
        assert!(!report.won);
        assert_eq!(grid.lit_map(), "##\n");
    }

    #[test]
    fn loops_are_lit_once() {
        let mut grid = GridBuilder::with_dims(dims(2, 2))
            .fill([PipeShape::Cross; 4])
            .set_entry(Location(0, 0), Side::Top)
            .set_exit(Location(1, 1), Side::Bottom)
            .build()
            .unwrap();

        let first = evaluate(&mut grid);
        assert!(first.won);
        assert_eq!(first.lit.len(), 4);
        assert_eq!(evaluate(&mut grid), first);
    }

    #[test]
    fn evaluation_clears_stale_light() {
        let mut grid = two_straights(0);
        evaluate(&mut grid);
        assert_eq!(grid.lit_locations().count(), 2);

        grid.rotate(1, 0);
        let report = evaluate(&mut grid);
        assert!(!report.won);
        assert_eq!(grid.lit_locations().collect_vec(), vec![Location(0, 0)]);
    }

    #[test]
    fn stamping_follows_the_path() {
        let mut grid = GridBuilder::with_dims(dims(3, 3))
            .set_entry(Location(0, 0), Side::Left)
            .set_exit(Location(2, 2), Side::Right)
            .build()
            .unwrap();

        let path = [Location(0, 0), Location(0, 1), Location(1, 1), Location(2, 1), Location(2, 2)];
        let solution = stamp_path(&mut grid, &path);

        assert_eq!(
            solution.steps().iter().map(|step| (step.shape, step.rotation)).collect_vec(),
            vec![
                (PipeShape::Straight, 1),
                (PipeShape::Elbow, 2),
                (PipeShape::Straight, 0),
                (PipeShape::Elbow, 0),
                (PipeShape::Straight, 1),
            ]
        );
        assert_eq!(format!("{}", grid), "─┐.
.│.
.└─
");

        assert!(evaluate(&mut grid).won);
        assert_eq!(grid.lit_map(), "##.
.#.
.##
");
    }

    #[test]
    fn unmatched_path_masks_become_crosses() {
        let mut grid = GridBuilder::with_dims(dims(3, 3))
            .set_entry(Location(0, 0), Side::Top)
            .set_exit(Location(2, 2), Side::Bottom)
            .build()
            .unwrap();

        // not adjacent, so neither cell can tell which way the other lies
        let solution = stamp_path(&mut grid, &[Location(0, 0), Location(2, 2)]);
        assert_eq!(solution.steps()[0].shape, PipeShape::Cross);
        assert_eq!(solution.steps()[1].shape, PipeShape::Cross);
    }

    #[test]
    fn rotating_outside_the_grid_does_nothing() {
        let mut grid = two_straights(0);
        let before = format!("{}", grid);

        grid.rotate(2, 0);
        grid.rotate(0, 1);
        grid.rotate(usize::MAX, usize::MAX);

        assert_eq!(format!("{}", grid), before);
        assert!(evaluate(&mut grid).won);
    }

    #[test]
    fn locked_tiles_do_not_turn() {
        let mut grid = GridBuilder::with_dims(dims(2, 1))
            .lock(Location(0, 0))
            .set_tile(Location(0, 0), PipeShape::Straight, 0)
            .set_tile(Location(1, 0), PipeShape::Straight, 1)
            .set_entry(Location(0, 0), Side::Top)
            .set_exit(Location(1, 0), Side::Bottom)
            .build()
            .unwrap();

        assert!(grid.tile(Location(0, 0)).unwrap().is_locked());
        grid.rotate(0, 0);
        assert_eq!(grid.tile(Location(0, 0)).unwrap().rotation(), 0);

        grid.rotate(1, 0);
        assert!(evaluate(&mut grid).won);
    }

    #[test]
    fn builder_rejects_bad_features() {
        let err = GridBuilder::with_dims(dims(2, 2))
            .set_tile(Location(2, 0), PipeShape::Tee, 0)
            .set_entry(Location(0, 0), Side::Top)
            .build()
            .unwrap_err();
        assert_eq!(err, vec![BuilderInvalidReason::FeatureOutOfBounds]);

        let err = GridBuilder::with_dims(dims(3, 3))
            .set_entry(Location(1, 1), Side::Top)
            .build()
            .unwrap_err();
        assert_eq!(err, vec![BuilderInvalidReason::AnchorOffSide]);

        let err = GridBuilder::with_dims(dims(3, 3))
            .set_tile(Location(1, 1), PipeShape::Elbow, 4)
            .build()
            .unwrap_err();
        assert_eq!(err, vec![BuilderInvalidReason::InvalidRotation]);

        let err = GridBuilder::with_dims(dims(3, 3))
            .set_entry(Location(0, 2), Side::Right)
            .build()
            .unwrap_err();
        assert_eq!(err, vec![BuilderInvalidReason::MissingAnchor]);
    }

    #[test]
    fn builder_stops_at_first_problem() {
        let mut builder = GridBuilder::with_dims(dims(2, 2));
        builder
            .set_tile(Location(5, 5), PipeShape::Cross, 0)
            .set_entry(Location(1, 1), Side::Top);

        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(1, 6)]
    #[case(6, 1)]
    #[case(2, 2)]
    #[case(6, 8)]
    #[case(12, 12)]
    fn generated_levels_are_solvable(#[case] rows: usize, #[case] cols: usize) {
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (mut grid, solution) = generate_level_with_solution(&GameConfig::with_dims(rows, cols), &mut rng).unwrap();
            let (entry, exit) = grid.anchors();
            let (entry, exit) = (*entry, *exit);

            assert_eq!(grid.dims(), (rows, cols));
            assert_eq!(exit.side(), entry.side().opposite());
            assert!(entry.side().borders(entry.location(), grid.dims()));
            assert!(exit.side().borders(exit.location(), grid.dims()));

            let path = solution.locations().collect_vec();
            assert_eq!(path.first(), Some(&entry.location()));
            assert_eq!(path.last(), Some(&exit.location()));
            assert!(path.iter().all_unique());
            assert!(path.iter().tuple_windows().all(|(a, b)| Direction::direction_to(*a, *b).is_some()));

            for tile in grid.tiles().iter() {
                assert_ne!(tile.shape(), PipeShape::Empty);
                assert!(tile.rotation() < 4);
            }
            for step in solution.steps() {
                assert_eq!(grid.tile(step.location).unwrap().shape(), step.shape);
                assert!(matches!(step.shape, PipeShape::Straight | PipeShape::Elbow));
            }

            solution.apply(&mut grid);
            let report = evaluate(&mut grid);
            assert!(report.won, "seed {seed} not solved:\n{grid}");
            assert!(path.iter().all(|location| report.lit.contains(location)));
        }
    }

    #[test]
    fn scrambling_keeps_shapes() {
        let shapes = |grid: &Grid| grid.tiles().iter().map(|tile| (tile.location(), tile.shape())).collect_vec();

        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dims = (6, 8);
            let (entry, exit) = place_anchors(dims, &mut rng);
            let path = carve_path(dims, entry.location(), exit.location(), &mut rng).unwrap();
            let mut grid = blank_grid(dims, entry, exit);
            let solution = stamp_path(&mut grid, &path);
            fill_decoys(&mut grid, &mut rng);

            let before = shapes(&grid);
            assert!(evaluate(&mut grid).won, "seed {seed} unsolved before scrambling:\n{grid}");

            scramble(&mut grid, &mut rng);
            assert_eq!(shapes(&grid), before);

            solution.apply(&mut grid);
            assert!(evaluate(&mut grid).won, "seed {seed} unsolved after restoring:\n{grid}");
        }
    }

    #[test]
    fn generation_gives_up_after_the_attempt_cap() {
        let config = GameConfig {
            max_generation_attempts: 5,
            ..GameConfig::with_dims(4, 4)
        };
        let mut tries = 0;

        let result = generate_with_carver(&config, &mut StdRng::seed_from_u64(0), |_, _, _, _| {
            tries += 1;
            None
        });

        assert_eq!(result.unwrap_err(), Error::GenerationExhausted { attempts: 5 });
        assert_eq!(tries, 5);
    }

    #[test]
    fn generation_retries_with_fresh_anchors() {
        let config = GameConfig {
            max_generation_attempts: 5,
            ..GameConfig::with_dims(4, 4)
        };
        let mut tries = 0;

        let (mut grid, solution) = generate_with_carver(&config, &mut StdRng::seed_from_u64(1), |dims, start, end, rng| {
            tries += 1;
            if tries < 3 {
                None
            } else {
                carve_path(dims, start, end, rng)
            }
        })
        .unwrap();

        assert_eq!(tries, 3);
        solution.apply(&mut grid);
        assert!(evaluate(&mut grid).won);
    }

    #[test]
    fn generation_is_reproducible() {
        let a = generate_level(7, 9, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_level(7, 9, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(format!("{}", a), format!("{}", b));
        assert_eq!(a.anchors(), b.anchors());
    }

    #[test]
    fn carving_rejects_cells_outside_the_grid() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(carve_path((3, 3), Location(0, 0), Location(3, 0), &mut rng), None);
        assert_eq!(carve_path((3, 3), Location(0, 0), Location(0, 0), &mut rng), Some(vec![Location(0, 0)]));
    }

    #[test]
    fn empty_grids_are_refused() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate_level(0, 4, &mut rng).unwrap_err(), Error::EmptyGrid { rows: 0, cols: 4 });

        let config = GameConfig {
            max_generation_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert!(Game::new(config, rng).is_err());
    }

    #[test]
    fn win_is_reported_once() {
        let wins = Rc::new(Cell::new(0));
        let mut game = Game::with_grid(GameConfig::with_dims(2, 1), StdRng::seed_from_u64(0), two_straights(1));
        assert!(!game.is_won());

        let counter = wins.clone();
        game.on_win(move |_| counter.set(counter.get() + 1));

        // a straight turned twice is upright again
        assert!(game.rotate_tile(0, 0).won);
        assert_eq!(wins.get(), 1);

        assert!(game.recompute_flow().won);
        assert!(game.recompute_flow().won);
        assert_eq!(wins.get(), 1);
        assert!(game.is_won());
    }

    #[test]
    fn win_present_from_the_start_is_reported_on_registration() {
        let wins = Rc::new(Cell::new(0));
        let mut game = Game::with_grid(GameConfig::with_dims(2, 1), StdRng::seed_from_u64(0), two_straights(0));
        assert!(game.is_won());

        let counter = wins.clone();
        game.on_win(move |_| counter.set(counter.get() + 1));
        assert_eq!(wins.get(), 1);

        game.recompute_flow();
        game.rotate_tile(0, 0);
        assert_eq!(wins.get(), 1);

        // a replacement callback does not hear about the same win again
        let counter = wins.clone();
        game.on_win(move |_| counter.set(counter.get() + 1));
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn single_cell_levels_report_their_win_once() {
        for seed in 0..50 {
            let wins = Rc::new(Cell::new(0));
            let mut game = Game::new(GameConfig::with_dims(1, 1), StdRng::seed_from_u64(seed)).unwrap();
            let counter = wins.clone();
            game.on_win(move |_| counter.set(counter.get() + 1));
            assert_eq!(wins.get(), usize::from(game.is_won()), "seed {seed}");

            // one of the four rotations of the lone straight joins entry to exit
            for _ in 0..4 {
                game.rotate_tile(0, 0);
            }
            assert!(game.is_won(), "seed {seed}");
            assert_eq!(wins.get(), 1, "seed {seed}");
        }
    }

    #[test]
    fn won_levels_ignore_input() {
        let mut game = Game::with_grid(GameConfig::with_dims(2, 1), StdRng::seed_from_u64(0), two_straights(0));
        assert!(game.is_won());

        game.rotate_tile(1, 0);
        assert_eq!(game.grid().tile(Location(1, 0)).unwrap().rotation(), 0);
        assert!(game.last_report().won);
    }

    #[test]
    fn restart_replaces_the_level() {
        let wins = Rc::new(Cell::new(0));
        let config = GameConfig::with_dims(6, 8);
        let mut game = Game::with_grid(config, StdRng::seed_from_u64(3), two_straights(0));
        let counter = wins.clone();
        game.on_win(move |_| counter.set(counter.get() + 1));
        assert!(game.is_won());
        assert_eq!(wins.get(), 1);

        game.restart().unwrap();
        assert_eq!(game.grid().dims(), (6, 8));
        assert_eq!(game.is_won(), game.last_report().won);
        assert_eq!(wins.get(), 1 + usize::from(game.is_won()));

        let lit = game.grid().lit_locations().collect::<std::collections::HashSet<_>>();
        assert_eq!(lit, game.last_report().lit);
    }

    #[test]
    fn out_of_bounds_clicks_still_evaluate() {
        let mut game = Game::with_grid(GameConfig::with_dims(2, 1), StdRng::seed_from_u64(0), two_straights(1));
        let report = game.rotate_tile(9, 9).clone();
        assert!(!report.won);
        assert!(report.lit.is_empty());
        assert_eq!(game.grid().tile(Location(0, 0)).unwrap().rotation(), 1);
    }
}
