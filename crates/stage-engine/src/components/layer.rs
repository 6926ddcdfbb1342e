/// Draw band. The render pass sorts by band, lowest first; within a band
/// scene order decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    #[default]
    Creatures = 1,
    Particles = 2,
    Overlay = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_default_to_the_creature_band() {
        assert_eq!(RenderLayer::default(), RenderLayer::Creatures);
    }

    #[test]
    fn bands_sort_back_to_front() {
        let mut bands = [
            RenderLayer::Overlay,
            RenderLayer::Particles,
            RenderLayer::Background,
            RenderLayer::Creatures,
        ];
        bands.sort();
        assert_eq!(
            bands,
            [
                RenderLayer::Background,
                RenderLayer::Creatures,
                RenderLayer::Particles,
                RenderLayer::Overlay,
            ]
        );
    }
}
