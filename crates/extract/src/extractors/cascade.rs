// ABOUTME: Ordered strategy lists ("cascades") used by every field extractor.
// ABOUTME: A cascade tries named strategies in order and returns the first non-empty result.

//! Strategy cascades.
//!
//! The site has changed its markup several times, so most fields can be found
//! in more than one way. Each field declares its ways as a static list of
//! named [`Strategy`] values, newest layout first. [`Cascade::run`] applies
//! them in order and stops at the first one that yields a value.

use scraper::Html;
use tracing::debug;

/// One way of locating a field in a document.
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&Html) -> Option<T>,
}

/// An ordered list of strategies for one field.
pub struct Cascade<T: 'static> {
    pub field: &'static str,
    pub strategies: &'static [Strategy<T>],
}

impl<T: 'static> Cascade<T> {
    /// Applies the strategies in order, returning the first result.
    pub fn run(&self, doc: &Html) -> Option<T> {
        for strategy in self.strategies {
            if let Some(value) = (strategy.run)(doc) {
                debug!(field = self.field, strategy = strategy.name, "strategy matched");
                return Some(value);
            }
        }
        debug!(field = self.field, "no strategy matched");
        None
    }

    /// Names of the strategies, in the order they are tried.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    /// Looks up a single strategy by name.
    pub fn strategy(&self, name: &str) -> Option<&Strategy<T>> {
        self.strategies.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &Html) -> Option<u32> {
        None
    }

    fn one(_: &Html) -> Option<u32> {
        Some(1)
    }

    fn two(_: &Html) -> Option<u32> {
        Some(2)
    }

    static NUMBERS: Cascade<u32> = Cascade {
        field: "numbers",
        strategies: &[
            Strategy { name: "never", run: never },
            Strategy { name: "one", run: one },
            Strategy { name: "two", run: two },
        ],
    };

    static EMPTY: Cascade<u32> = Cascade {
        field: "empty",
        strategies: &[Strategy { name: "never", run: never }],
    };

    #[test]
    fn first_non_empty_strategy_wins() {
        let doc = Html::parse_document("<html></html>");
        assert_eq!(NUMBERS.run(&doc), Some(1));
    }

    #[test]
    fn exhausted_cascade_is_none() {
        let doc = Html::parse_document("<html></html>");
        assert_eq!(EMPTY.run(&doc), None);
    }

    #[test]
    fn strategies_are_addressable_by_name() {
        let doc = Html::parse_document("<html></html>");
        assert_eq!(NUMBERS.names(), vec!["never", "one", "two"]);
        let two = NUMBERS.strategy("two").unwrap();
        assert_eq!((two.run)(&doc), Some(2));
        assert!(NUMBERS.strategy("three").is_none());
    }
}
