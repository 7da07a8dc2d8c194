//! Tokenization engines and the [`Production`] trait.

use crate::{Outcome, Runtime, RuntimeError};
use core::fmt;
use std::rc::Rc;

/// A recognizer: anything that can run against a [`Runtime`] and report an
/// [`Outcome`].
///
/// Compiled grammar rules are plain functions or closures of type
/// `Fn(&mut Runtime) -> Result<Outcome, RuntimeError>`, which implement this
/// trait through the blanket impl.  Use [`named`] to attach a name that shows
/// up in trace logs.
pub trait Production {
    fn call(&self, rt: &mut Runtime) -> Result<Outcome, RuntimeError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Production for F
where
    F: Fn(&mut Runtime) -> Result<Outcome, RuntimeError>,
{
    #[inline]
    fn call(&self, rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
        self(rt)
    }
}

/// A production with an explicit name.
pub struct Named<P> {
    name: &'static str,
    production: P,
}

/// Wraps `production` so that it reports `name` in logs.
pub fn named<P: Production>(name: &'static str, production: P) -> Named<P> {
    Named { name, production }
}

impl<P: Production> Production for Named<P> {
    #[inline]
    fn call(&self, rt: &mut Runtime) -> Result<Outcome, RuntimeError> {
        self.production.call(rt)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// A tokenization strategy on the scanner's engine stack.
///
/// The scanner consults the topmost engine for every token.  An empty stack
/// behaves like [`Engine::Utf8`].
#[derive(Clone)]
pub enum Engine {
    /// One UTF-8 code point per token, length taken from the lead byte.
    Utf8,
    /// One raw byte per token.
    Byte,
    /// A production that is run to produce each token.
    Custom(Rc<dyn Production>),
}

impl Engine {
    /// Convenience constructor for [`Engine::Custom`].
    pub fn custom(production: impl Production + 'static) -> Self {
        Engine::Custom(Rc::new(production))
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Utf8 => f.write_str("Utf8"),
            Engine::Byte => f.write_str("Byte"),
            Engine::Custom(p) => f.debug_tuple("Custom").field(&p.name()).finish(),
        }
    }
}
