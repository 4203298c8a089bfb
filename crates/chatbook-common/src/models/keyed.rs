/// Anything the list core can window over: it only needs a stable identity.
pub trait Keyed {
    fn key(&self) -> &str;
}
