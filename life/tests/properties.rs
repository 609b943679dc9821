use life::grid::count_alive;
use life::{Frame, Grid};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn population_matches_a_full_scan(
        size in 1usize..24,
        density in 0.0f64..=1.0,
        seed: u64,
        ticks in 0u64..12,
    ) {
        let mut grid = Grid::random(size, density, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(grid.generation(), 0);
        prop_assert_eq!(grid.population(), count_alive(grid.cells()));

        for expected in 1..=ticks {
            grid.tick();
            prop_assert_eq!(grid.generation(), expected);
            prop_assert_eq!(grid.population(), count_alive(grid.cells()));
            prop_assert!(grid.population() <= size * size);
        }
        prop_assert!(grid.verify().is_ok());
    }

    #[test]
    fn equal_worlds_evolve_identically(
        size in 3usize..20,
        density in 0.1f64..0.6,
        seed: u64,
        ticks in 1usize..16,
    ) {
        let source = Grid::random(size, density, &mut StdRng::seed_from_u64(seed)).unwrap();
        let mut a = Grid::from_cells(source.cells().clone()).unwrap();
        let mut b = Grid::from_cells(source.cells().clone()).unwrap();
        prop_assert_eq!(a.fingerprint(), b.fingerprint());

        for _ in 0..ticks {
            prop_assert_eq!(a.tick(), b.tick());
            prop_assert_eq!(a.cells(), b.cells());
        }
    }

    #[test]
    fn snapshot_copies_exactly_what_is_published(
        size in 1usize..16,
        density in 0.0f64..=1.0,
        seed: u64,
    ) {
        let mut grid = Grid::random(size, density, &mut StdRng::seed_from_u64(seed)).unwrap();
        grid.tick();
        let mut frame = Frame::for_size(size);
        grid.snapshot(&mut frame).unwrap();

        prop_assert_eq!(frame.cells(), grid.cells());
        prop_assert_eq!(frame.population(), count_alive(frame.cells()));
        prop_assert_eq!(frame.alive_cells().count(), frame.population());
    }
}
