//! Energy cost table and estimation.
//!
//! Costs are fixed integers per model; a batch is billed as
//! `base_cost * batch_size` before any network call is dispatched.

use crate::model::ModelId;

// ---------------------------------------------------------------------------
// Cost table
// ---------------------------------------------------------------------------

/// Energy cost of one flash-tier text generation.
pub const TEXT_FLASH_COST: u32 = 1;
/// Energy cost of one pro-tier text generation.
pub const TEXT_PRO_COST: u32 = 2;
/// Energy cost of one flash-tier image generation.
pub const IMAGE_FLASH_COST: u32 = 3;
/// Energy cost of one pro-tier image generation.
pub const IMAGE_PRO_COST: u32 = 6;
/// Energy cost of one fast (720p) video generation.
pub const VIDEO_FAST_COST: u32 = 70;
/// Energy cost of one HD (1080p) video generation.
pub const VIDEO_HD_COST: u32 = 140;

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Energy cost of a single generation with the given model.
pub fn base_cost(model: ModelId) -> u32 {
    match model {
        ModelId::TextFlash => TEXT_FLASH_COST,
        ModelId::TextPro => TEXT_PRO_COST,
        ModelId::ImageFlash => IMAGE_FLASH_COST,
        ModelId::ImagePro => IMAGE_PRO_COST,
        ModelId::VideoFast => VIDEO_FAST_COST,
        ModelId::VideoHd => VIDEO_HD_COST,
    }
}

/// Total energy cost of a request fanning out into `batch_size` calls.
///
/// A zero batch size is treated as one.
pub fn estimate_cost(model: ModelId, batch_size: u32) -> u32 {
    base_cost(model) * batch_size.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_costs_match_table() {
        assert_eq!(base_cost(ModelId::TextFlash), 1);
        assert_eq!(base_cost(ModelId::TextPro), 2);
        assert_eq!(base_cost(ModelId::ImageFlash), 3);
        assert_eq!(base_cost(ModelId::ImagePro), 6);
        assert_eq!(base_cost(ModelId::VideoFast), 70);
        assert_eq!(base_cost(ModelId::VideoHd), 140);
    }

    #[test]
    fn batch_multiplies_base_cost() {
        assert_eq!(estimate_cost(ModelId::ImagePro, 4), 24);
        assert_eq!(estimate_cost(ModelId::ImageFlash, 4), 12);
        assert_eq!(estimate_cost(ModelId::TextFlash, 3), 3);
    }

    #[test]
    fn single_call_costs_base() {
        assert_eq!(estimate_cost(ModelId::VideoHd, 1), 140);
    }

    #[test]
    fn zero_batch_treated_as_one() {
        assert_eq!(estimate_cost(ModelId::ImageFlash, 0), 3);
    }
}
