//! Static page shells. The guard in front of them decides who gets to see
//! which; data is loaded by the browser through the RPC procedures.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

fn render(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav><a href=\"/\">Home</a> <a href=\"/dashboard\">Dashboard</a> \
         <a href=\"/notes\">Notes</a> <a href=\"/profile\">Profile</a></nav>\n\
         <main>{body}</main>\n</body>\n</html>\n"
    ))
}

pub async fn home() -> Html<String> {
    render(
        "Home",
        "<h1>Notes</h1><p><a href=\"/signup\">Get Started</a> <a href=\"/signin\">Sign In</a></p>",
    )
}

pub async fn sign_in() -> Html<String> {
    render("Sign In", "<h1>Sign In</h1>")
}

pub async fn sign_up() -> Html<String> {
    render("Sign Up", "<h1>Sign Up</h1>")
}

pub async fn forgot_password() -> Html<String> {
    render("Forgot Password", "<h1>Forgot Password</h1>")
}

pub async fn reset_password() -> Html<String> {
    render("Reset Password", "<h1>Reset Password</h1>")
}

pub async fn dashboard() -> Html<String> {
    render(
        "Dashboard",
        "<h1>Dashboard</h1><p><a href=\"/notes\">View Notes</a> <a href=\"/profile\">Edit Profile</a></p>",
    )
}

pub async fn notes() -> Html<String> {
    render("Notes", "<h1>Notes</h1>")
}

pub async fn profile() -> Html<String> {
    render("Profile", "<h1>Profile</h1>")
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, render("Not Found", "<h1>Not Found</h1>")).into_response()
}
