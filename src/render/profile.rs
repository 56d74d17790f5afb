use crate::dom::dom_model::{escape_attr, escape_text};
use crate::render::profile_model::{Movie, ProfileData, job_label, pet_adjective};
use crate::render::verdict::{Colour, classify, round_to_tenth};

// ============================================================================
// Profile view: header, career box, pets box, movie box
// ============================================================================

/// One "info-container" box with a coloured suitability line.
struct InfoBox<'a> {
    kind: &'a str,
    heading: &'a str,
    body: String,
    /// Rounded score with its colour and verdict; `None` hides the score section
    score: Option<(f64, Colour, String)>,
}

/// Build the full profile markup for the render target.
///
/// Layout: greeting header, then `#profile-container` holding a left column
/// (career box, optional pets box) followed by the movie box.
pub fn render_profile_html(data: &ProfileData) -> String {
    let max_score = data.max_score;

    let job_score = round_to_tenth(data.career.suitability);
    let (job_colour, job_verdict) = classify(job_score, max_score);

    let job_box = InfoBox {
        kind: "job",
        heading: "Career Information",
        body: format!(
            "<p><b>You chose:</b> <i>{}</i></p>",
            escape_text(job_label(&data.career.desired))
        ),
        score: Some((job_score, job_colour, job_verdict)),
    };

    let movie_score = data.movies.psych.suitability.map(|s| {
        let rounded = round_to_tenth(s);
        let (colour, verdict) = classify(rounded, max_score);
        (rounded, colour, verdict)
    });

    let movie_box = InfoBox {
        kind: "movie",
        heading: "Movie Recommendations",
        body: format!(
            "<p><b>Based on your preferred career:</b></p>\n{}<p><b>Based on your responses:</b></p>\n{}",
            movie_html(&data.movies.job, "job-poster"),
            movie_html(&data.movies.psych, "psych-poster"),
        ),
        score: movie_score,
    };

    let mut left_col = info_box_html(&job_box, max_score);
    if let Some(pets) = pets_html(data) {
        left_col.push_str(&pets);
    }

    format!(
        "{header}<div id=\"profile-container\"><div id=\"left-col\">{left}</div>{movies}</div>",
        header = header_html(&data.name),
        left = left_col,
        movies = info_box_html(&movie_box, max_score),
    )
}

/// Header line, greeting the user by name when one was given.
pub fn header_html(name: &str) -> String {
    let greeting = if name.is_empty() {
        String::new()
    } else {
        format!("Hi {}. ", escape_text(name))
    };
    format!(
        "<h2 class=\"view-header\">{}Welcome to your profile.</h2>",
        greeting
    )
}

fn info_box_html(info: &InfoBox<'_>, max_score: f64) -> String {
    let mut out = format!(
        "<div class=\"info-container\" id=\"{kind}-container\">\n<h2>{heading}</h2>\n{body}\n",
        kind = info.kind,
        heading = info.heading,
        body = info.body,
    );

    if let Some((score, colour, verdict)) = &info.score {
        out.push_str(&format!(
            r#"<h4>Psychological Suitability</h4>
<div id="{kind}-suitability" style="background-color: {colour}">
<span>{score:.1} / {max}</span>
</div>
<p><b>Outcome</b>: <i>{verdict}</i></p>
"#,
            kind = info.kind,
            colour = colour,
            score = score,
            max = format_max(max_score),
            verdict = escape_text(verdict),
        ));
    }

    out.push_str("</div>");
    out
}

fn movie_html(movie: &Movie, poster_id: &str) -> String {
    format!(
        r#"<p><i>{title}</i> ({year})</p>
<span id="{poster_id}"><img src="{src}" alt="Poster for {alt}"></span>
<p><i>{plot}</i></p>
<p>(Rated: {rating})</p>
"#,
        title = escape_text(&movie.title),
        year = escape_text(&movie.year),
        poster_id = poster_id,
        src = escape_attr(&movie.poster_url),
        alt = escape_attr(&movie.title),
        plot = escape_text(&movie.plot),
        rating = escape_text(&movie.rating),
    )
}

/// Pets box, or `None` when the profile lists no pets.
fn pets_html(data: &ProfileData) -> Option<String> {
    if data.pets.is_empty() {
        return None;
    }

    let mut out = String::from(
        "<div class=\"info-container\" id=\"pet-container\"><h2>Pet Images</h2>",
    );
    for (i, pet) in data.pets.iter().enumerate() {
        out.push_str(&format!(
            "<p>A <i>{adj}</i> <b>{kind}</b>:</p><img src=\"{src}\" alt=\"An image of a {alt}\">",
            adj = pet_adjective(i),
            kind = escape_text(&pet.kind),
            src = escape_attr(&pet.url),
            alt = escape_attr(&pet.kind),
        ));
    }
    out.push_str("</div>");
    Some(out)
}

/// Whole maxima print without a trailing ".0", as the server sends them.
fn format_max(max_score: f64) -> String {
    if max_score.fract() == 0.0 {
        format!("{}", max_score as i64)
    } else {
        format!("{}", max_score)
    }
}
