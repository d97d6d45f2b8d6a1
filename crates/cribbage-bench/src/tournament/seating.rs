/// Alternates which agent sits in which seat from game to game.
///
/// The first seat deals first, so even games put agent 0 there and odd games
/// swap the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    agents: [usize; 2],
}

impl Seating {
    pub fn for_game(game_index: usize) -> Self {
        let agents = if game_index % 2 == 0 { [0, 1] } else { [1, 0] };
        Self { agents }
    }

    /// Agent index sitting in each seat, in seat order.
    pub fn agents(&self) -> [usize; 2] {
        self.agents
    }
}
