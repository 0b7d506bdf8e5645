//! Static pages.

use axum::response::Html;
use knowlift_domain::{prettify_number, LevelCatalog};

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | Knowlift</title></head>\n\
         <body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/grade\">Play</a> <a href=\"/ladder\">Ladder</a> \
         <a href=\"/about\">About</a> <a href=\"/legal\">Legal</a></nav>\n\
         <main>\n{body}\n</main>\n\
         </body>\n\
         </html>\n"
    ))
}

/// Landing page
pub fn index() -> Html<String> {
    layout(
        "Home",
        "<h1>Knowlift</h1>\n\
         <p>How many integers does an interval hold? Pick a grade and find out how fast you can count.</p>\n\
         <p><a href=\"/grade\">Start playing</a></p>",
    )
}

/// What the game is about
pub fn about() -> Html<String> {
    layout(
        "About",
        "<h1>About</h1>\n\
         <p>Each round shows two integers and a bracket on each side. \
         A square bracket includes its bound, a round one leaves it out. \
         Answer with the number of integers in between.</p>\n\
         <p>Every ten answers the game looks at how you did and moves you \
         one grade up or down.</p>",
    )
}

/// Grade selection, one entry per tier in the catalog
pub fn grade(catalog: &LevelCatalog) -> Html<String> {
    let mut items = String::new();
    for (index, level) in catalog.levels().iter().enumerate() {
        items.push_str(&format!(
            "<li><form method=\"post\" action=\"/play\">\
             <input type=\"hidden\" name=\"level\" value=\"{index}\">\
             <button type=\"submit\">{label}</button> \
             <span>{lower} to {upper}</span>\
             </form></li>\n",
            label = level.label,
            lower = prettify_number(level.lower),
            upper = prettify_number(level.upper),
        ));
    }

    layout(
        "Grade",
        &format!("<h1>Choose a grade</h1>\n<ol start=\"0\">\n{items}</ol>"),
    )
}

/// Leaderboard placeholder
pub fn ladder() -> Html<String> {
    layout("Ladder", "<h1>Ladder</h1>\n<p>Coming soon.</p>")
}

/// Terms and licensing
pub fn legal() -> Html<String> {
    layout(
        "Legal",
        "<h1>Legal</h1>\n\
         <p>Knowlift is free software released under the GNU Affero General \
         Public License, version 3 or later.</p>\n\
         <p>No personal data is collected while playing. Game progress is kept \
         in a signed token held by your browser.</p>",
    )
}
