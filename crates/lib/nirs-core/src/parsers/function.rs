use crate::models::{Entity, EntityKind};
use crate::parsers::classdef::{declared_function_name, parse_methods};
use crate::parsers::scan::leading_comment_block;
use crate::source::SourceFile;

const SIGNATURE_WINDOW: usize = 20;
const DESCRIPTION_WINDOW: usize = 50;
const FUNCTION_KEYWORD: &str = "function";

pub(crate) fn parse_function(file: &SourceFile) -> Entity {
    let content = file.content();
    let mut entity = Entity::empty(EntityKind::Function, file.stem(), file.path());

    let lines: Vec<&str> = content
        .split('\n')
        .take(DESCRIPTION_WINDOW)
        .collect();

    if let Some(signature) = lines
        .iter()
        .take(SIGNATURE_WINDOW)
        .map(|line| line.trim())
        .find(|line| line.starts_with(FUNCTION_KEYWORD))
    {
        entity.signature = signature.to_string();
        if let Some(name) = declared_function_name(signature) {
            entity.name = name;
        }
    }

    let starts_with_declaration = lines
        .first()
        .is_some_and(|line| line.trim().starts_with(FUNCTION_KEYWORD));
    let skip = usize::from(starts_with_declaration);
    entity.description = leading_comment_block(lines.iter().skip(skip).copied());

    entity.methods = parse_methods(content, &entity.name);
    entity
}
