//! Bare server-rendered pages. Every interpolated value goes through [`escape`].

use std::fmt::Write;

use axum::response::Html;

use crate::flash::Flash;
use crate::recipes::{dto::RecipeForm, repo_types::Recipe};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&Flash>, logged_in: bool, body: &str) -> Html<String> {
    let nav = if logged_in {
        r#"<a href="/">Recipes</a> | <a href="/add">Add recipe</a> | <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/">Recipes</a> | <a href="/login">Log in</a> | <a href="/register">Register</a>"#
    };
    let flash = flash
        .map(|f| {
            format!(
                r#"<p class="flash {}">{}</p>"#,
                f.kind.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><nav>{nav}</nav>{flash}<h1>{title}</h1>{body}</body></html>",
        title = escape(title),
    ))
}

fn error_line(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="flash error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn index(recipes: &[Recipe], flash: Option<&Flash>, logged_in: bool) -> Html<String> {
    let mut body = String::new();
    if recipes.is_empty() {
        body.push_str("<p>No recipes yet.</p>");
    } else {
        body.push_str("<table><tr><th>Name</th><th>Ingredients</th><th>Cook time (min)</th><th></th></tr>");
        for r in recipes {
            let _ = write!(
                body,
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><a href="/edit_recipe/{}">Edit</a></td></tr>"#,
                escape(&r.recipe_name),
                escape(&r.ingredients),
                r.cook_time,
                r.id
            );
        }
        body.push_str("</table>");
    }
    layout("Recipes", flash, logged_in, &body)
}

/// Add and edit share one form; `action` is where it posts.
pub fn recipe_form(
    heading: &str,
    action: &str,
    values: &RecipeForm,
    error: Option<&str>,
) -> Html<String> {
    let body = format!(
        r#"{error}<form method="post" action="{action}">
<label>Name <input name="recipe_name" value="{name}" required maxlength="100"></label>
<label>Ingredients <textarea name="ingredients">{ingredients}</textarea></label>
<label>Cook time (minutes) <input name="cook_time" value="{cook_time}" inputmode="numeric"></label>
<button type="submit">Save</button>
</form>"#,
        error = error_line(error),
        action = escape(action),
        name = escape(&values.recipe_name),
        ingredients = escape(&values.ingredients),
        cook_time = escape(&values.cook_time),
    );
    layout(heading, None, true, &body)
}

fn credentials_form(action: &str, username: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Username <input name="username" value="{username}" required maxlength="100"></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">{submit}</button>
</form>"#,
        username = escape(username),
    )
}

pub fn login_page(flash: Option<&Flash>, username: &str, error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}{}",
        error_line(error),
        credentials_form("/login", username, "Log in")
    );
    layout("Log in", flash, false, &body)
}

pub fn register_page(flash: Option<&Flash>, username: &str, error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}{}",
        error_line(error),
        credentials_form("/register", username, "Register")
    );
    layout("Register", flash, false, &body)
}
