use crate::chart::Chart;
use crate::grammar::Grammar;
use crate::item::{ChartItem, Item, ItemRef, Origin};

pub trait Rendered {
    fn rendered(&self) -> String;
}

/// The tree below one chart item, rendered as `S(NP(I),VP(...))`: a label
/// followed by its children in parentheses. Words are rendered bare.
pub struct ParseTree<'c> {
    chart: &'c Chart,
    grammar: &'c Grammar,
    root: ItemRef,
}

impl<'c> ParseTree<'c> {
    pub fn new(chart: &'c Chart, grammar: &'c Grammar, root: ItemRef) -> Self {
        ParseTree { chart, grammar, root }
    }

    fn render_into(&self, r: ItemRef, out: &mut String) {
        let item = self.chart.item(r);
        out.push_str(item.category(self.grammar).as_str());
        if let Item::Cyk(cyk) = item {
            if cyk.origin == Origin::Word {
                return;
            }
        }
        out.push('(');
        for (i, &child) in item.children().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.render_into(child, out);
        }
        out.push(')');
    }
}

impl<'c> Rendered for ParseTree<'c> {
    fn rendered(&self) -> String {
        let mut out = String::new();
        self.render_into(self.root, &mut out);
        out
    }
}
