// implemented where a channel subscription captures an Rc back to its owner; the cycle must be broken by hand
pub trait Destroyable {
    fn destroy(&mut self);
}
