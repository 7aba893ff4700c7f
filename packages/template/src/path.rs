use serde_json::{Map, Value};

/// One step of a variable path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parse `user.address.city`, `items[0].title` or `items.0.title`.
///
/// Returns `None` when the text is not a well-formed path; such placeholders
/// are left untouched.
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    if path.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };

        if key.is_empty() {
            // `a.[0]` reads as `a[0]`; a path cannot start with an index
            if segments.is_empty() || rest.is_empty() {
                return None;
            }
        } else if !key.chars().all(is_key_char) {
            return None;
        } else {
            segments.push(PathSegment::Key(key.to_string()));
        }

        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest[1..close].parse::<usize>().ok()?;
            segments.push(PathSegment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }

    Some(segments)
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '$'
}

/// Resolve `path` against `variables`.
///
/// Numeric keys index into arrays; `None` means the path does not resolve.
pub fn lookup<'v>(variables: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let segments = parse_path(path)?;
    let (first, rest) = segments.split_first()?;

    let mut current = match first {
        PathSegment::Key(key) => variables.get(key)?,
        PathSegment::Index(_) => return None,
    };

    for segment in rest {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
            (PathSegment::Key(key), Value::Array(items)) => items.get(key.parse::<usize>().ok()?)?,
            (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
            _ => return None,
        };
    }

    Some(current)
}
