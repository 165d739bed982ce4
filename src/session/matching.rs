use rand::Rng;
use rand::seq::SliceRandom;

use crate::session::error::SessionError;
use crate::words::{Side, WordPair};

pub const MATCHING_WORD_COUNT: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: usize,
    pub content: String,
    pub side: Side,
    pub word_id: String,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.word_id == other.word_id && self.side != other.side
    }
}

/// What a flip did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flip {
    /// First card of a pair is face up.
    Single,
    /// Second card is face up; the board is locked until resolved.
    Pair { is_match: bool },
}

#[derive(Clone, Debug)]
pub struct MatchingBoard {
    pub cards: Vec<Card>,
    face_up: Vec<usize>,
    locked: bool,
    pub moves: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
}

impl MatchingBoard {
    /// Two cards per word for the first eight words of `sequence`.
    pub fn new<R: Rng>(sequence: &[WordPair], rng: &mut R) -> Self {
        let words = &sequence[..sequence.len().min(MATCHING_WORD_COUNT)];
        let mut cards: Vec<Card> = words
            .iter()
            .flat_map(|w| {
                [
                    (Side::Source, w.primary_source().to_string()),
                    (Side::Target, w.target.clone()),
                ]
                .into_iter()
                .map(move |(side, content)| Card {
                    id: 0,
                    content,
                    side,
                    word_id: w.id.clone(),
                    flipped: false,
                    matched: false,
                })
            })
            .collect();
        cards.shuffle(rng);
        for (i, card) in cards.iter_mut().enumerate() {
            card.id = i;
        }

        Self {
            cards,
            face_up: Vec::with_capacity(2),
            locked: false,
            moves: 0,
            matched_pairs: 0,
            total_pairs: words.len(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    pub fn flip(&mut self, index: usize) -> Result<Flip, SessionError> {
        if self.locked {
            return Err(SessionError::InputLocked);
        }
        let card = self
            .cards
            .get_mut(index)
            .filter(|c| !c.flipped && !c.matched)
            .ok_or(SessionError::InvalidCard(index))?;
        card.flipped = true;
        self.face_up.push(index);

        match self.face_up[..] {
            [a, b] => {
                self.moves += 1;
                self.locked = true;
                Ok(Flip::Pair {
                    is_match: self.cards[a].pairs_with(&self.cards[b]),
                })
            }
            _ => Ok(Flip::Single),
        }
    }

    /// Settle the revealed pair: keep a match, turn a mismatch back over.
    /// Returns whether the pair matched.
    pub fn resolve(&mut self) -> Result<bool, SessionError> {
        let [a, b] = self.face_up[..] else {
            return Err(SessionError::NotAnswered);
        };
        let is_match = self.cards[a].pairs_with(&self.cards[b]);
        for i in [a, b] {
            if is_match {
                self.cards[i].matched = true;
            } else {
                self.cards[i].flipped = false;
            }
        }
        if is_match {
            self.matched_pairs += 1;
        }
        self.face_up.clear();
        self.locked = false;
        Ok(is_match)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::words::{BundledWords, WordBank};

    fn board() -> MatchingBoard {
        let bank = BundledWords::load();
        MatchingBoard::new(bank.list(), &mut SmallRng::seed_from_u64(5))
    }

    fn partner(board: &MatchingBoard, index: usize) -> usize {
        let card = &board.cards[index];
        board
            .cards
            .iter()
            .position(|c| c.pairs_with(card))
            .unwrap()
    }

    fn stranger(board: &MatchingBoard, index: usize) -> usize {
        let word_id = &board.cards[index].word_id;
        board
            .cards
            .iter()
            .position(|c| &c.word_id != word_id)
            .unwrap()
    }

    #[test]
    fn builds_two_cards_per_word() {
        let board = board();
        assert_eq!(board.cards.len(), 16);
        assert_eq!(board.total_pairs, 8);
        for card in &board.cards {
            assert_eq!(
                board.cards.iter().filter(|c| c.word_id == card.word_id).count(),
                2
            );
        }
        assert!(board.cards.iter().enumerate().all(|(i, c)| c.id == i));
    }

    #[test]
    fn match_is_kept() {
        let mut board = board();
        let other = partner(&board, 0);
        assert_eq!(board.flip(0), Ok(Flip::Single));
        assert_eq!(board.flip(other), Ok(Flip::Pair { is_match: true }));
        assert!(board.is_locked());
        assert_eq!(board.flip(3), Err(SessionError::InputLocked));
        assert_eq!(board.resolve(), Ok(true));
        assert!(board.cards[0].matched && board.cards[other].matched);
        assert_eq!(board.matched_pairs, 1);
        assert_eq!(board.flip(0), Err(SessionError::InvalidCard(0)));
    }

    #[test]
    fn mismatch_flips_back() {
        let mut board = board();
        let other = stranger(&board, 0);
        board.flip(0).unwrap();
        assert_eq!(board.flip(other), Ok(Flip::Pair { is_match: false }));
        assert_eq!(board.resolve(), Ok(false));
        assert!(!board.cards[0].flipped && !board.cards[other].flipped);
        assert_eq!(board.moves, 1);
        assert_eq!(board.matched_pairs, 0);
        assert!(!board.is_locked());
    }

    #[test]
    fn same_card_cannot_be_flipped_twice() {
        let mut board = board();
        board.flip(2).unwrap();
        assert_eq!(board.flip(2), Err(SessionError::InvalidCard(2)));
        assert_eq!(board.flip(99), Err(SessionError::InvalidCard(99)));
        assert_eq!(board.resolve(), Err(SessionError::NotAnswered));
    }
}
