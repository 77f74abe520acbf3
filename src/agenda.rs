use crate::chart::Chart;
use crate::item::Item;

/// Items waiting to be added to the chart, processed last in first out.
#[derive(Debug, Default)]
pub struct Agenda {
    items: Vec<Item>,
}

impl Agenda {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Pushes `item` unless an equal item is already on the chart or waiting
    /// here. Returns whether it was pushed.
    pub fn add_item(&mut self, item: Item, chart: &Chart) -> bool {
        if chart.contains(&item) || self.items.iter().any(|i| i.is_equal_to(&item, chart.features())) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn pop(&mut self) -> Option<Item> { self.items.pop() }
}
