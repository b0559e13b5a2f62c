//! The sample source contract.

/// Something that yields one normalized sample per call.
///
/// `t` is the caller's notion of time in seconds. Sources in this workspace
/// are purely sequential and ignore it: the n-th call returns the n-th
/// sample no matter what `t` says.
pub trait SampleSource {
    fn get_sample(&mut self, t: f64) -> f32;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn get_sample(&mut self, t: f64) -> f32 {
        (**self).get_sample(t)
    }
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn get_sample(&mut self, t: f64) -> f32 {
        (**self).get_sample(t)
    }
}
