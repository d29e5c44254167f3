use crate::error::TemplateError;

use super::Placeholder;

/// A template body split into literal text and placeholders.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder),
}

/// Split `body` on `{{ ... }}` tokens. `name` is only used for error messages.
pub(crate) fn parse<'a>(name: &str, body: &'a str) -> Result<Vec<Segment<'a>>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = body;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Literal(&rest[..start]));
        }
        let inner = &rest[start + 2..];
        let Some(end) = inner.find("}}") else {
            return Err(TemplateError::Unterminated {
                template: name.to_string(),
                offset: offset + start,
            });
        };

        let token = inner[..end].trim();
        let placeholder = Placeholder::parse(token).ok_or_else(|| TemplateError::UnknownPlaceholder {
            template: name.to_string(),
            token: token.to_string(),
        })?;
        segments.push(Segment::Placeholder(placeholder));

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_literals_and_placeholders() {
        let segments = parse("t", "{{ .DockerCompose }} logs {{.Service.Name}}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Placeholder(Placeholder::DockerCompose),
                Segment::Literal(" logs "),
                Segment::Placeholder(Placeholder::ServiceName),
            ]
        );
    }

    #[test]
    fn plain_text_is_one_literal() {
        assert_eq!(parse("t", "docker ps").unwrap(), vec![Segment::Literal("docker ps")]);
        assert!(parse("t", "").unwrap().is_empty());
    }

    #[test]
    fn unterminated_reports_offset() {
        let err = parse("Broken", "docker {{ .Container.ID }} {{ .Service.Name").unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unterminated { template: "Broken".into(), offset: 27 }
        );
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = parse("Odd", "echo {{ .Image.ID }}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder { template: "Odd".into(), token: ".Image.ID".into() }
        );
    }

    #[test]
    fn single_braces_are_literal() {
        let segments = parse("t", "sh -c 'echo {x}'").unwrap();
        assert_eq!(segments, vec![Segment::Literal("sh -c 'echo {x}'")]);
    }
}
