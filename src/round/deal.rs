//! Dealing a fresh grid.

use crate::cards::Card;
use crate::core::{CardId, GameError, GameRng, GameSettings, GridPosition, ImageId, Result};

/// Deal one round from `settings`.
///
/// Picks `pair_count` distinct images without replacement, lays each down
/// twice, shuffles, and assigns slot `i` to `CardId(i)` in row-major order.
/// Settings are validated before anything is built.
pub fn deal(settings: &GameSettings, rng: &mut GameRng) -> Result<Vec<Card>> {
    settings.validate()?;

    let mut pool = settings.distinct_images();
    rng.shuffle(&mut pool);

    let pairs = settings.pair_count();
    let chosen = rng.sample(&pool, pairs).ok_or_else(|| {
        GameError::InvalidConfig(format!("need {} distinct images, got {}", pairs, pool.len()))
    })?;

    let mut images: Vec<ImageId> = chosen.iter().flat_map(|&image| [image, image]).collect();
    rng.shuffle(&mut images);

    let cards = images
        .into_iter()
        .enumerate()
        .map(|(slot, image)| {
            Card::new(
                CardId::new(slot as u32),
                image,
                GridPosition::from_slot(slot, settings.cols),
            )
        })
        .collect();

    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn settings(rows: u8, cols: u8, images: u32) -> GameSettings {
        GameSettings::new(rows, cols).with_images((0..images).map(ImageId::new))
    }

    #[test]
    fn test_each_image_dealt_twice() {
        let mut rng = GameRng::new(1);
        let cards = deal(&settings(4, 4, 12), &mut rng).unwrap();

        assert_eq!(cards.len(), 16);
        let mut counts: FxHashMap<ImageId, usize> = FxHashMap::default();
        for card in &cards {
            *counts.entry(card.image()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_ids_and_positions_follow_slots() {
        let mut rng = GameRng::new(2);
        let cards = deal(&settings(2, 3, 3), &mut rng).unwrap();

        for (slot, card) in cards.iter().enumerate() {
            assert_eq!(card.id().index(), slot);
            assert_eq!(card.position(), GridPosition::from_slot(slot, 3));
            assert!(!card.is_matched());
            assert!(!card.is_face_up());
        }
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = deal(&settings(4, 4, 20), &mut GameRng::new(99)).unwrap();
        let b = deal(&settings(4, 4, 20), &mut GameRng::new(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_small_pool() {
        let mut rng = GameRng::new(3);
        let err = deal(&settings(4, 4, 7), &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }
}
