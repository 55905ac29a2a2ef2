use grid_search::pathfinder::{PathFinder, PathFinderConfig};
use grid_search::{DiagonalMovement, Grid};

// In this example a path is found on a grid with shape
// #####
// #S  #
// # # #
// #  E#
// #####
// S marks the start
// E marks the end
fn main() {
    let mut grid = Grid::from_matrix(&[
        [1, 1, 1, 1, 1],
        [1, 0, 0, 0, 1],
        [1, 0, 1, 0, 1],
        [1, 0, 0, 0, 1],
        [1, 1, 1, 1, 1],
    ])
    .unwrap();
    let finder = PathFinder::new(PathFinderConfig {
        diagonal_movement: DiagonalMovement::Never,
        ..Default::default()
    })
    .unwrap();
    let path = finder.find_path(1, 1, 3, 3, &mut grid);
    if !path.is_empty() {
        println!("A path has been found:");
        for p in path {
            println!("{:?}", p);
        }
    }
}
