use core::fmt;
use grid_util::Point;

/// Distance estimate from a cell to the goal used to order the A* frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// `|dx| + |dy|`. Matches the step count of 4-directional movement.
    #[default]
    Manhattan,
    /// `sqrt(dx² + dy²)`. Never larger than Manhattan, so it explores more.
    Euclidean,
    /// `max(|dx|, |dy|)`. The natural estimate for 8-directional movement; kept selectable
    /// here although it was not designed for this movement model.
    Chebyshev,
}

impl Heuristic {
    /// All variants, in the order they are usually presented.
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Chebyshev,
    ];

    pub fn estimate(&self, p1: &Point, p2: &Point) -> f64 {
        let delta_x = f64::from((p1.x - p2.x).abs());
        let delta_y = f64::from((p1.y - p2.y).abs());
        match self {
            Heuristic::Manhattan => delta_x + delta_y,
            Heuristic::Euclidean => (delta_x * delta_x + delta_y * delta_y).sqrt(),
            Heuristic::Chebyshev => delta_x.max(delta_y),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Heuristic::Manhattan => "Manhattan",
            Heuristic::Euclidean => "Euclidean",
            Heuristic::Chebyshev => "Chebyshev",
        };
        f.write_str(name)
    }
}
