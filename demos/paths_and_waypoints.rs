use grid_search::path::{compress_path, expand_path, smoothen_path};
use grid_search::pathfinder::{Algorithm, PathFinder, PathFinderConfig};
use grid_search::{DiagonalMovement, Grid};

/// This example illustrates the output of Jump Point Search, which only returns the jump
/// points of the route. They can be expanded into single steps using [expand_path].
/// A path is found on a 5x5 grid with shape
/// S
///  #
///
///
///     E
/// where
/// - S marks the start
/// - E marks the end
fn main() {
    let mut grid = Grid::new(5, 5);
    grid.set_walkable_at(1, 1, false).unwrap();
    println!("{}", grid);
    let finder = PathFinder::new(PathFinderConfig {
        algorithm: Algorithm::JumpPoint,
        diagonal_movement: DiagonalMovement::OnlyWhenNoObstacles,
        ..Default::default()
    })
    .unwrap();
    let path = finder.find_path(0, 0, 4, 4, &mut grid);
    println!("Unexpanded path:");
    for p in &path {
        println!("{:?}", p);
    }
    let expanded = expand_path(&path);
    println!("Expanded path:");
    for p in &expanded {
        println!("{:?}", p);
    }
    // The expanded path compresses back to its turning points
    println!("Compressed path: {:?}", compress_path(&expanded));
    println!("Smoothened path: {:?}", smoothen_path(&grid, &expanded));
    // There also exists a variant which expands the path automatically.
    println!("{:?}", finder.find_expanded_path(0, 0, 4, 4, &mut grid));
}
