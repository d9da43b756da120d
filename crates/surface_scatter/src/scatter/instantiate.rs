//! Hand-off of finished placements to the host.
use crate::scatter::Placement;

/// Receives every accepted placement once a run completes.
pub trait Instantiator {
    fn instantiate(&mut self, placement: &Placement);
}

/// Discards placements; useful when only the recorded results are needed.
impl Instantiator for () {
    #[inline]
    fn instantiate(&mut self, _placement: &Placement) {}
}

/// Collects clones of the placements.
impl Instantiator for Vec<Placement> {
    fn instantiate(&mut self, placement: &Placement) {
        self.push(placement.clone());
    }
}

impl<I: Instantiator + ?Sized> Instantiator for &mut I {
    #[inline]
    fn instantiate(&mut self, placement: &Placement) {
        (**self).instantiate(placement);
    }
}

/// Forwards placements to a closure.
pub struct FnInstantiator<F>
where
    F: FnMut(&Placement),
{
    f: F,
}

impl<F> FnInstantiator<F>
where
    F: FnMut(&Placement),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Instantiator for FnInstantiator<F>
where
    F: FnMut(&Placement),
{
    #[inline]
    fn instantiate(&mut self, placement: &Placement) {
        (self.f)(placement);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    fn placement(variant_index: usize) -> Placement {
        Placement {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            variant_index,
            variant_id: format!("v{variant_index}"),
            cluster: None,
        }
    }

    fn feed<I: Instantiator>(mut target: I, placement: &Placement) {
        target.instantiate(placement);
    }

    #[test]
    fn vec_collects_placements() {
        let mut out: Vec<Placement> = Vec::new();
        out.instantiate(&placement(0));
        feed(&mut out, &placement(1));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].variant_id, "v1");
    }

    #[test]
    fn closure_receives_placements() {
        let mut seen = Vec::new();
        let mut sink = FnInstantiator::new(|p: &Placement| seen.push(p.variant_index));
        sink.instantiate(&placement(4));
        sink.instantiate(&placement(2));
        drop(sink);
        assert_eq!(seen, vec![4, 2]);
    }
}
