use crate::ast::{ElementKind, FormatKind, Object, ObjectList};
use serde::Serialize;

/// One parsed object in the flat record shape host bindings consume:
/// `(elem_type, obj_type, args, fmt)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<'src> {
    pub elem_type: &'static str,
    pub obj_type: &'src str,
    pub args: Vec<(&'src str, Option<&'src str>)>,
    pub fmt: Option<Vec<(&'static str, &'src str, usize)>>,
}

fn elem_type(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Real => "ELEM_REAL",
        ElementKind::Imaginary => "ELEM_IMAG",
    }
}

fn fmt_type(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Literal => "FMT_STR",
        FormatKind::AttributeValue { .. } => "FMT_VAL",
    }
}

pub(crate) fn to_record<'src>(object: &Object<'src>) -> Record<'src> {
    Record {
        elem_type: elem_type(object.kind),
        obj_type: object.type_name,
        args: object
            .arguments
            .iter()
            .map(|arg| (arg.name, arg.value))
            .collect(),
        fmt: object.format_tokens.as_ref().map(|tokens| {
            tokens
                .iter()
                .map(|t| (fmt_type(t.kind), t.text, t.line_no))
                .collect()
        }),
    }
}

pub(crate) fn to_records<'src>(objects: &ObjectList<'src>) -> Vec<Record<'src>> {
    objects.iter().map(to_record).collect()
}
