use super::service::CustomerMatch;
use maud::{html, Markup, DOCTYPE};

fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no";
            title { (title) }
        }
        body {
            h1 { (title) }
            (content)
        }
    }
}

fn search_form() -> Markup {
    html! {
        form class="find-customer" action="/find_customer" method="POST" {
            fieldset {
                label { "Street:" br; input type="text" name="street" placeholder="1600 Main St"; }
                br;
                label { "City:" br; input type="text" name="city" placeholder="Denver"; }
                br;
                label { "State:" br; input type="text" name="state" placeholder="CO"; }
                br;
                input type="submit" value="Find nearest customer";
            }
        }
    }
}

pub fn index() -> Markup {
    page("Find Nearest Customer", search_form())
}

pub fn result(found: &CustomerMatch) -> Markup {
    let c = &found.customer;
    page(
        "Nearest Customer",
        html! {
            p class="query" { "Searched for: " (found.query) }
            dl class="customer" {
                dt { "Customer ID" } dd { (c.customer_id) }
                dt { "Name" } dd { (c.name) }
                dt { "Address" } dd { (c.address) ", " (c.city) ", " (c.state) }
                dt { "Region" } dd { (c.region) }
                dt { "Distance" } dd { (format!("{:.2} miles", found.distance_miles)) }
            }
            p { a href=(found.link) target="_blank" { "Open in dashboard" } }
            a href="/" { "New search" }
        },
    )
}

pub fn error(message: &str) -> Markup {
    page(
        "Error",
        html! {
            div class="flash error" { (message) }
            (search_form())
        },
    )
}
