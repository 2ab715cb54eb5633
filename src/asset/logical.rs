//! Pure helpers over `/`-separated logical asset paths.

use super::ResolveError;

/// Directory part of a logical path (`styles/main.css` -> `styles`).
///
/// Top-level assets have an empty directory.
pub fn containing_dir(identity: &str) -> &str {
    identity.rfind('/').map_or("", |idx| &identity[..idx])
}

/// Join a relative reference onto a directory, `/`-separated.
///
/// An empty directory leaves the reference as is.
pub fn join_relative(dir: &str, reference: &str) -> String {
    if dir.is_empty() {
        reference.to_string()
    } else {
        format!("{dir}/{reference}")
    }
}

/// Collapse empty, `.` and `..` segments.
///
/// Fails when `..` would climb above the logical root.
///
/// # Example
/// ```ignore
/// normalize_logical("styles/../img//a.png") == Ok("img/a.png".into())
/// ```
pub fn normalize_logical(path: &str) -> Result<String, ResolveError> {
    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::Escapes(path.to_string()));
                }
            }
            seg => segments.push(seg),
        }
    }
    if segments.is_empty() {
        return Err(ResolveError::Empty(path.to_string()));
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_dir() {
        assert_eq!(containing_dir("styles/main.css"), "styles");
        assert_eq!(containing_dir("a/b/c.css"), "a/b");
        assert_eq!(containing_dir("main.css"), "");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("styles", "img/a.png"), "styles/img/a.png");
        assert_eq!(join_relative("", "img/a.png"), "img/a.png");
    }

    #[test]
    fn test_normalize_logical() {
        assert_eq!(normalize_logical("styles/img/a.png").unwrap(), "styles/img/a.png");
        assert_eq!(normalize_logical("styles/../img/a.png").unwrap(), "img/a.png");
        assert_eq!(normalize_logical("./styles//./a.png").unwrap(), "styles/a.png");
    }

    #[test]
    fn test_normalize_logical_escape() {
        assert!(matches!(
            normalize_logical("styles/../../a.png"),
            Err(ResolveError::Escapes(_))
        ));
        assert!(matches!(normalize_logical("./"), Err(ResolveError::Empty(_))));
    }
}
