use rand::Rng;
use rand::seq::SliceRandom;

const EMOJI_POOL: [&str; 32] = [
    "🦁", "🐯", "🐵", "🐼", "🐸", "🐰", "🦊", "🐻", "🐨", "🐷", "🐮", "🐔", "🦉", "🦄", "🐙",
    "🐢", "🦋", "🐬", "🐟", "🦓", "🦒", "🐘", "🦜", "🦀", "🐝", "🐍", "🦌", "🐴", "🐱", "🐶",
    "🐧", "🦦",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Down,
    Up,
    Done,
}

#[derive(Debug, Clone)]
pub struct Tile {
    emoji: &'static str,
    face: Face,
}

impl Tile {
    pub fn face(&self) -> Face {
        self.face
    }

    /// Face value as shown to the player; hidden tiles don't reveal it.
    pub fn label(&self) -> &'static str {
        match self.face {
            Face::Down => "❓",
            Face::Up | Face::Done => self.emoji,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Flip was not legal right now (locked board, open or finished tile).
    Ignored,
    /// First tile of a turn is now face up.
    Opened,
    /// Second tile matched the first.
    Matched,
    /// Second tile matched and the board is finished.
    Won,
    /// Second tile did not match; board stays locked until `settle_mismatch`.
    Mismatch,
}

/// Memory-match board: two flips per turn, a lock while a mismatched pair is
/// face up, win once every pair is found.
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    first_open: Option<usize>,
    mismatch: Option<(usize, usize)>,
    matched_pairs: usize,
    total_pairs: usize,
}

impl Board {
    pub fn deal(size: usize) -> Option<Self> {
        Self::deal_with_rng(size, &mut rand::thread_rng())
    }

    pub fn deal_with_rng(size: usize, rng: &mut impl Rng) -> Option<Self> {
        let total_cards = size.checked_mul(size)?;
        if total_cards == 0 || total_cards % 2 != 0 || total_cards / 2 > EMOJI_POOL.len() {
            return None;
        }

        let total_pairs = total_cards / 2;
        let mut deck: Vec<&'static str> = EMOJI_POOL[..total_pairs]
            .iter()
            .chain(EMOJI_POOL[..total_pairs].iter())
            .copied()
            .collect();
        deck.shuffle(rng);

        Some(Self {
            size,
            tiles: deck
                .into_iter()
                .map(|emoji| Tile {
                    emoji,
                    face: Face::Down,
                })
                .collect(),
            first_open: None,
            mismatch: None,
            matched_pairs: 0,
            total_pairs,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_won(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.mismatch.is_some() || index >= self.tiles.len() {
            return FlipOutcome::Ignored;
        }
        if self.tiles[index].face != Face::Down {
            return FlipOutcome::Ignored;
        }

        self.tiles[index].face = Face::Up;

        let Some(first) = self.first_open else {
            self.first_open = Some(index);
            return FlipOutcome::Opened;
        };
        self.first_open = None;

        if self.tiles[first].emoji == self.tiles[index].emoji {
            self.tiles[first].face = Face::Done;
            self.tiles[index].face = Face::Done;
            self.matched_pairs += 1;
            if self.is_won() {
                FlipOutcome::Won
            } else {
                FlipOutcome::Matched
            }
        } else {
            self.mismatch = Some((first, index));
            FlipOutcome::Mismatch
        }
    }

    /// Turns a mismatched pair face down again and unlocks the board.
    pub fn settle_mismatch(&mut self) {
        if let Some((a, b)) = self.mismatch.take() {
            self.tiles[a].face = Face::Down;
            self.tiles[b].face = Face::Down;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dealt(size: usize) -> Board {
        Board::deal_with_rng(size, &mut StdRng::seed_from_u64(7)).unwrap()
    }

    fn pair_indices(board: &Board) -> (usize, usize, usize) {
        let emojis: Vec<_> = board.tiles().iter().map(|t| t.emoji).collect();
        for a in 0..emojis.len() {
            for b in (a + 1)..emojis.len() {
                if emojis[a] == emojis[b] {
                    let other = (0..emojis.len())
                        .find(|&i| i != a && i != b)
                        .expect("board has more than one pair's worth of tiles");
                    return (a, b, other);
                }
            }
        }
        unreachable!("a dealt board always contains pairs");
    }

    #[test]
    fn odd_or_oversized_boards_are_rejected() {
        assert!(Board::deal_with_rng(3, &mut StdRng::seed_from_u64(1)).is_none());
        assert!(Board::deal_with_rng(0, &mut StdRng::seed_from_u64(1)).is_none());
        assert!(Board::deal_with_rng(10, &mut StdRng::seed_from_u64(1)).is_none());
        assert!(Board::deal_with_rng(4, &mut StdRng::seed_from_u64(1)).is_some());
    }

    #[test]
    fn matching_pair_stays_done() {
        let mut board = dealt(4);
        let (a, b, _) = pair_indices(&board);

        assert_eq!(board.flip(a), FlipOutcome::Opened);
        assert_eq!(board.flip(b), FlipOutcome::Matched);
        assert_eq!(board.tiles()[a].face(), Face::Done);
        assert_eq!(board.tiles()[b].face(), Face::Done);
    }

    #[test]
    fn reopening_an_open_tile_is_ignored() {
        let mut board = dealt(4);
        let (a, _, _) = pair_indices(&board);
        board.flip(a);
        assert_eq!(board.flip(a), FlipOutcome::Ignored);
    }

    #[test]
    fn mismatch_locks_until_settled() {
        let mut board = dealt(4);
        // Each emoji appears exactly twice, so `other` never matches `a`.
        let (a, b, other) = pair_indices(&board);

        assert_eq!(board.flip(a), FlipOutcome::Opened);
        assert_eq!(board.flip(other), FlipOutcome::Mismatch);
        assert_eq!(board.flip(b), FlipOutcome::Ignored);

        board.settle_mismatch();
        assert_eq!(board.tiles()[a].face(), Face::Down);
        assert_eq!(board.tiles()[other].face(), Face::Down);
        assert_eq!(board.flip(a), FlipOutcome::Opened);
    }

    #[test]
    fn finding_every_pair_wins() {
        let mut board = dealt(2);
        let mut outcomes = Vec::new();

        while !board.is_won() {
            let emojis: Vec<_> = board.tiles().iter().map(|t| t.emoji).collect();
            let open: Vec<_> = (0..emojis.len())
                .filter(|&i| board.tiles()[i].face() == Face::Down)
                .collect();
            let a = open[0];
            let b = open[1..]
                .iter()
                .copied()
                .find(|&i| emojis[i] == emojis[a])
                .unwrap();
            board.flip(a);
            outcomes.push(board.flip(b));
        }

        assert_eq!(outcomes.last(), Some(&FlipOutcome::Won));
        assert!(board.tiles().iter().all(|t| t.face() == Face::Done));
    }

    #[test]
    fn hidden_tiles_do_not_reveal_their_face() {
        let board = dealt(4);
        assert!(board.tiles().iter().all(|t| t.label() == "❓"));
    }
}
