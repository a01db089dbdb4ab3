use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Entity, EntityKind, Method, Property};
use crate::parsers::scan::{comment_run, is_comment, line_index_at, squash_whitespace};
use crate::source::SourceFile;

const DESCRIPTION_WINDOW: usize = 20;
const METHOD_COMMENT_WINDOW: usize = 10;

static CLASS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclassdef\b[ \t]*(?:\([^)]*\)[ \t]*)?(\w+)[ \t]*(?:<[ \t]*([\w.]+))?")
        .expect("class header pattern is valid")
});

static PROPERTIES_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*properties\b(.*?)^[ \t]*end\b")
        .expect("properties block pattern is valid")
});

static FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*function\s+(\[[^\]]*\]|\w+)\s*=\s*(\w+)\s*\(([^)]*)\)|^[ \t]*function\s+(\w+)\s*\(([^)]*)\)",
    )
    .expect("function declaration pattern is valid")
});

pub(crate) fn parse_class(file: &SourceFile) -> Entity {
    let content = file.content();
    let mut entity = Entity::empty(EntityKind::Class, file.stem(), file.path());

    if let Some(captures) = CLASS_HEADER.captures(content) {
        if let Some(name) = captures.get(1) {
            entity.name = name.as_str().to_string();
        }
        if let Some(parent) = captures.get(2) {
            entity.parent = parent.as_str().to_string();
        }
    }

    entity.description = comment_run(content.split('\n').take(DESCRIPTION_WINDOW).skip(1));
    entity.properties = parse_properties(content);
    entity.methods = parse_methods(content, &entity.name);
    entity
}

/// Entries of the first `properties ... end` block.
pub(crate) fn parse_properties(content: &str) -> Vec<Property> {
    let Some(body) = PROPERTIES_BLOCK
        .captures(content)
        .and_then(|captures| captures.get(1))
    else {
        return Vec::new();
    };

    let mut lines = body.as_str().split('\n');
    let mut properties = Vec::new();

    // The remainder of the `properties` line holds the attribute list, if any.
    if let Some(header) = lines.next() {
        let header = header.trim();
        if !header.starts_with('(') {
            properties.extend(parse_property_line(header));
        }
    }
    for line in lines {
        properties.extend(parse_property_line(line.trim()));
    }
    properties
}

/// Parses `name = default; % comment` into its parts.
pub(crate) fn parse_property_line(line: &str) -> Option<Property> {
    if line.is_empty() || is_comment(line) {
        return None;
    }

    let (code, comment) = match line.split_once('%') {
        Some((code, comment)) => (code.trim(), non_empty(comment.trim())),
        None => (line, None),
    };

    let (name, default) = match code.split_once('=') {
        Some((name, default)) => (
            name.trim(),
            non_empty(default.trim().trim_end_matches(';').trim()),
        ),
        None => (code.trim_end_matches(';').trim(), None),
    };

    if name.is_empty() {
        return None;
    }

    Some(Property {
        name: name.to_string(),
        default,
        comment,
        raw: line.to_string(),
    })
}

/// Every declared function except the one named `own_name`.
pub(crate) fn parse_methods(content: &str, own_name: &str) -> Vec<Method> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut methods = Vec::new();

    for captures in FUNCTION_DECL.captures_iter(content) {
        let (returns, name, params) = match (captures.get(2), captures.get(4)) {
            (Some(name), _) => (captures.get(1), name, captures.get(3)),
            (None, Some(name)) => (None, name, captures.get(5)),
            (None, None) => continue,
        };
        if name.as_str() == own_name {
            continue;
        }

        let decl_end = captures.get(0).map_or(0, |whole| whole.end());
        let first_line = line_index_at(content, decl_end) + 1;
        let comment = comment_run(
            lines
                .iter()
                .skip(first_line)
                .take(METHOD_COMMENT_WINDOW)
                .copied(),
        );

        methods.push(Method {
            name: name.as_str().to_string(),
            returns: returns.and_then(|value| non_empty(value.as_str().trim())),
            params: params
                .map(|value| squash_whitespace(value.as_str()))
                .unwrap_or_default(),
            comment: non_empty(&comment),
        });
    }
    methods
}

/// Name declared by a single `function` line, if it parses as one.
pub(crate) fn declared_function_name(line: &str) -> Option<String> {
    let captures = FUNCTION_DECL.captures(line)?;
    captures
        .get(2)
        .or_else(|| captures.get(4))
        .map(|name| name.as_str().to_string())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTER: &str = "classdef BandPassFilter < nirs.modules.AbstractModule
%% BandPassFilter - Band-pass filter
% Applies a zero-phase filter.

    properties
        lowpass = .5; % upper cutoff (Hz)
        highpass = 0.016; % lower cutoff (Hz)
        do_downsample = false;
        % a commented-out line
        order
    end

    methods
        function obj = BandPassFilter( prevJob )
            obj.name = 'Band-pass filter';
        end

        function data = runThis( obj, data )
            % Filters every channel.
            % Returns the filtered data.
            for i = 1:numel(data)
            end
        end

        function reset(obj)
        end
    end
end
";

    fn class_file(text: &str) -> SourceFile {
        SourceFile::from_text("/tb/+nirs/+modules/BandPassFilter.m", text)
    }

    #[test]
    fn header_captures_name_and_dotted_parent() {
        let entity = parse_class(&class_file(FILTER));

        assert_eq!(entity.kind, EntityKind::Class);
        assert_eq!(entity.name, "BandPassFilter");
        assert_eq!(entity.parent, "nirs.modules.AbstractModule");
        assert_eq!(
            entity.description,
            "BandPassFilter - Band-pass filter\nApplies a zero-phase filter."
        );
    }

    #[test]
    fn missing_parent_is_empty() {
        let entity = parse_class(&class_file("classdef Foo\nend\n"));

        assert_eq!(entity.name, "Foo");
        assert_eq!(entity.parent, "");
        assert!(entity.parent().is_none());
    }

    #[test]
    fn class_attributes_are_tolerated() {
        let entity = parse_class(&class_file("classdef (Abstract) Base < handle\nend\n"));

        assert_eq!(entity.name, "Base");
        assert_eq!(entity.parent, "handle");
    }

    #[test]
    fn properties_carry_defaults_and_comments() {
        let entity = parse_class(&class_file(FILTER));
        let names: Vec<&str> = entity.properties.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["lowpass", "highpass", "do_downsample", "order"]);
        assert_eq!(entity.properties[0].default.as_deref(), Some(".5"));
        assert_eq!(entity.properties[0].comment.as_deref(), Some("upper cutoff (Hz)"));
        assert_eq!(entity.properties[2].default.as_deref(), Some("false"));
        assert_eq!(entity.properties[2].comment, None);
        assert_eq!(entity.properties[3].default, None);
        assert_eq!(entity.properties[0].raw, "lowpass = .5; % upper cutoff (Hz)");
    }

    #[test]
    fn property_attribute_list_is_not_a_property() {
        let props = parse_properties("properties (SetAccess = private)\n  x = 1;\nend\n");

        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "x");
    }

    #[test]
    fn duplicate_properties_are_kept_in_order() {
        let props = parse_properties("properties\n  a = 1;\n  a = 2;\nend\n");

        assert_eq!(props.len(), 2);
        assert_eq!(props[1].default.as_deref(), Some("2"));
    }

    #[test]
    fn constructor_is_excluded_from_methods() {
        let entity = parse_class(&class_file(FILTER));
        let names: Vec<&str> = entity.methods.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, ["runThis", "reset"]);
        assert!(entity.methods.iter().all(|m| m.name != entity.name));
    }

    #[test]
    fn methods_capture_returns_params_and_doc() {
        let entity = parse_class(&class_file(FILTER));
        let run = &entity.methods[0];

        assert_eq!(run.returns.as_deref(), Some("data"));
        assert_eq!(run.params, "obj, data");
        assert_eq!(
            run.comment.as_deref(),
            Some("Filters every channel.\nReturns the filtered data.")
        );

        let reset = &entity.methods[1];
        assert_eq!(reset.returns, None);
        assert_eq!(reset.params, "obj");
        assert_eq!(reset.comment, None);
    }

    #[test]
    fn multiple_return_values_are_kept_verbatim() {
        let methods = parse_methods("function [a, b] = split(x, y)\n% Splits.\nend\n", "Other");

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].returns.as_deref(), Some("[a, b]"));
        assert_eq!(methods[0].comment.as_deref(), Some("Splits."));
    }

    #[test]
    fn malformed_class_degrades_to_defaults() {
        let entity = parse_class(&class_file("classdef\nproperties\n"));

        assert_eq!(entity.name, "BandPassFilter");
        assert!(entity.properties.is_empty());
        assert!(entity.methods.is_empty());
        assert_eq!(entity.description, "");
    }
}
