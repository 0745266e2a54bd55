//! Chart generation for the reports page.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisType},
    series::{Line, bar},
};

use crate::dashboard::{currency_formatter, currency_tooltip};

/// Line chart of monthly expenses over the last six months.
pub(super) fn monthly_expenses_chart(labels: Vec<String>, values: Vec<f64>) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Monthly expenses")
                .subtext("Last six months"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Expenses").data(values))
}

/// Bar chart of the five largest expense categories in the selected
/// period.
pub(super) fn top_categories_chart(top_categories: &[(String, f64)]) -> Chart {
    let labels: Vec<String> = top_categories
        .iter()
        .map(|(category, _)| category.clone())
        .collect();
    let values: Vec<f64> = top_categories.iter().map(|(_, total)| *total).collect();

    Chart::new()
        .title(Title::new().text("Top categories"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spent").data(values))
}
