//! Page templates, embedded at compile time and parsed once at startup.

use tera::Tera;

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name)))
    };
}

/// Parse every page template. Fails on the first syntax error.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();

    // Layouts and partials must be registered in the same call as the pages
    // that extend or include them.
    tera.add_raw_templates(vec![
        template!("base.html"),
        template!("users/_fields.html"),
        template!("users/list.html"),
        template!("users/new.html"),
        template!("users/edit.html"),
        template!("users/detail.html"),
        template!("posts/_fields.html"),
        template!("posts/new.html"),
        template!("posts/edit.html"),
        template!("posts/detail.html"),
        template!("tags/list.html"),
        template!("tags/new.html"),
        template!("tags/edit.html"),
        template!("tags/detail.html"),
    ])?;

    tracing::debug!(count = tera.get_template_names().count(), "Templates loaded");
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let tera = load().expect("templates should parse");
        assert!(tera.get_template_names().any(|n| n == "users/list.html"));
        assert!(tera.get_template_names().any(|n| n == "tags/detail.html"));
    }

    #[test]
    fn test_html_is_autoescaped() {
        let tera = load().unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("flashes", &Vec::<String>::new());
        ctx.insert(
            "tags",
            &vec![serde_json::json!({"id": 1, "name": "<b>bold</b>"})],
        );

        let html = tera.render("tags/list.html", &ctx).unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;&#x2F;b&gt;"));
    }
}
