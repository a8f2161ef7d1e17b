//! Minimal server-rendered HTML pages.
//!
//! Templating is out of scope for this application, so the views are
//! plain functions producing small documents. Every piece of
//! user-supplied text is escaped before interpolation.

use crate::db::models::{Category, Item, ItemDetails};
use axum::http::StatusCode;
use html_escape::{encode_double_quoted_attribute, encode_text};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title} — To-Do List</title></head>
<body>
<nav>
  <a href="/items">My items</a> |
  <a href="/items/create">New item</a> |
  <a href="/categories">Categories</a>
  <form method="post" action="/account/logoff" style="display:inline"><button type="submit">Log off</button></form>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = encode_text(title),
        body = body,
    )
}

fn notice_block(notice: Option<&str>) -> String {
    match notice {
        Some(n) => format!("<p class=\"notice\">{}</p>", encode_text(n)),
        None => String::new(),
    }
}

fn category_options(categories: &[Category]) -> String {
    let mut options = String::from("<option value=\"0\">-- no category --</option>");
    for category in categories {
        options.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            category.id,
            encode_text(&category.name),
        ));
    }
    options
}

pub fn landing_page() -> String {
    layout(
        "Welcome",
        r#"<p><a href="/account/register">Register</a> or <a href="/account/login">log in</a> to manage your to-do list.</p>"#,
    )
}

pub fn register_page(notice: Option<&str>) -> String {
    let body = format!(
        r#"{notice}
<form method="post" action="/account/register">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Register</button>
</form>
<p>Already have an account? <a href="/account/login">Log in</a>.</p>"#,
        notice = notice_block(notice),
    );
    layout("Register", &body)
}

pub fn login_page(notice: Option<&str>) -> String {
    let body = format!(
        r#"{notice}
<form method="post" action="/account/login">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>
<p>New here? <a href="/account/register">Register</a>.</p>"#,
        notice = notice_block(notice),
    );
    layout("Log in", &body)
}

pub fn items_page(email: &str, items: &[Item]) -> String {
    let body = if items.is_empty() {
        "<p>No items yet.</p>".to_string()
    } else {
        let rows: String = items
            .iter()
            .map(|item| {
                format!(
                    r#"<li>{desc}{done} — <a href="/items/details/{id}">details</a> <a href="/items/edit/{id}">edit</a> <a href="/items/add-category/{id}">add category</a> <a href="/items/delete/{id}">delete</a></li>"#,
                    desc = encode_text(&item.description),
                    done = if item.done { " (done)" } else { "" },
                    id = item.id,
                )
            })
            .collect();
        format!("<ul>{rows}</ul>")
    };
    layout(&format!("Items for {email}"), &body)
}

pub fn item_create_page(categories: &[Category]) -> String {
    let body = format!(
        r#"<form method="post" action="/items/create">
  <label>Description <input type="text" name="description" required></label>
  <label>Done <input type="checkbox" name="done"></label>
  <label>Category <select name="category_id">{options}</select></label>
  <button type="submit">Create</button>
</form>"#,
        options = category_options(categories),
    );
    layout("New item", &body)
}

pub fn item_edit_page(item: &Item, categories: &[Category]) -> String {
    let body = format!(
        r#"<form method="post" action="/items/edit/{id}">
  <label>Description <input type="text" name="description" value="{desc}" required></label>
  <label>Done <input type="checkbox" name="done"{checked}></label>
  <label>Add category <select name="category_id">{options}</select></label>
  <button type="submit">Save</button>
</form>"#,
        id = item.id,
        desc = encode_double_quoted_attribute(&item.description),
        checked = if item.done { " checked" } else { "" },
        options = category_options(categories),
    );
    layout("Edit item", &body)
}

pub fn add_category_page(item: &Item, categories: &[Category]) -> String {
    let body = format!(
        r#"<p>Attach a category to <strong>{desc}</strong>.</p>
<form method="post" action="/items/add-category/{id}">
  <label>Category <select name="category_id">{options}</select></label>
  <button type="submit">Attach</button>
</form>"#,
        desc = encode_text(&item.description),
        id = item.id,
        options = category_options(categories),
    );
    layout("Add category", &body)
}

pub fn details_page(details: &ItemDetails) -> String {
    let categories = if details.categories.is_empty() {
        "<p>No categories attached.</p>".to_string()
    } else {
        let rows: String = details
            .categories
            .iter()
            .map(|attached| {
                format!(
                    r#"<li>{name} <form method="post" action="/items/delete-category" style="display:inline"><input type="hidden" name="join_id" value="{join_id}"><button type="submit">remove</button></form></li>"#,
                    name = encode_text(&attached.name),
                    join_id = attached.join_id,
                )
            })
            .collect();
        format!("<ul>{rows}</ul>")
    };
    let body = format!(
        r#"<p>{desc}{done}</p>
<h2>Categories</h2>
{categories}
<p><a href="/items/edit/{id}">Edit</a> <a href="/items/add-category/{id}">Add category</a></p>"#,
        desc = encode_text(&details.item.description),
        done = if details.item.done { " (done)" } else { "" },
        categories = categories,
        id = details.item.id,
    );
    layout("Item details", &body)
}

pub fn delete_confirm_page(item: &Item) -> String {
    let body = format!(
        r#"<p>Delete <strong>{desc}</strong>? This also removes its category associations.</p>
<form method="post" action="/items/delete/{id}">
  <button type="submit">Delete</button>
</form>
<p><a href="/items">Cancel</a></p>"#,
        desc = encode_text(&item.description),
        id = item.id,
    );
    layout("Confirm delete", &body)
}

pub fn categories_page(categories: &[Category]) -> String {
    let listing = if categories.is_empty() {
        "<p>No categories yet.</p>".to_string()
    } else {
        let rows: String = categories
            .iter()
            .map(|category| format!("<li>{}</li>", encode_text(&category.name)))
            .collect();
        format!("<ul>{rows}</ul>")
    };
    let body = format!(
        r#"{listing}
<form method="post" action="/categories/create">
  <label>Name <input type="text" name="name" required></label>
  <button type="submit">Create category</button>
</form>"#,
    );
    layout("Categories", &body)
}

pub fn error_page(status: StatusCode, title: &str) -> String {
    let body = format!(
        "<p>{code} — {reason}</p><p><a href=\"/items\">Back to your items</a></p>",
        code = status.as_u16(),
        reason = encode_text(status.canonical_reason().unwrap_or("error")),
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(description: &str, done: bool) -> Item {
        Item {
            id: 1,
            description: description.to_string(),
            done,
            user_id: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let page = items_page("a@x.com", &[item("<script>alert(1)</script>", false)]);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn edit_form_prefills_and_checks_done() {
        let page = item_edit_page(&item("Buy \"milk\"", true), &[]);
        assert!(page.contains("checked"));
        assert!(page.contains("Buy &quot;milk&quot;"));
    }

    #[test]
    fn options_always_carry_the_none_sentinel() {
        let options = category_options(&[Category {
            id: 3,
            name: "home".to_string(),
        }]);
        assert!(options.starts_with("<option value=\"0\">"));
        assert!(options.contains("<option value=\"3\">home</option>"));
    }
}
