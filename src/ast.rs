use serde::Serialize;

/// Type name of the object that collects attribute lines seen before any header.
pub const DEFAULT_ROOT: &str = "ROOT";

/// Type name given to imaginary objects holding blanks and comments between objects.
pub const FORMAT_PLACEHOLDER: &str = "__fmt__";

/// Whether an object was written in the input or only anchors format tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Real,
    Imaginary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    /// Keywords, names, braces, `=`, comments, blanks and line endings.
    Literal,
    /// The value of the argument at `argument` in the owning object.
    AttributeValue { argument: usize },
}

/// One consumed lexeme, kept so the input can be written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatToken<'src> {
    pub kind: FormatKind,
    pub text: &'src str,
    pub line_no: usize,
}

impl<'src> FormatToken<'src> {
    pub fn new(kind: FormatKind, text: &'src str, line_no: usize) -> FormatToken<'src> {
        FormatToken {
            kind,
            text,
            line_no,
        }
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self.kind, FormatKind::AttributeValue { .. })
    }
}

/// A `name value` (object files) or `name=value` (status files) line.
///
/// `value` is `None` only when an object-mode line carries a bare name, which
/// is different from an explicitly empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Argument<'src> {
    pub name: &'src str,
    pub value: Option<&'src str>,
}

impl<'src> Argument<'src> {
    pub fn new(name: &'src str, value: Option<&'src str>) -> Argument<'src> {
        Argument { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Object<'src> {
    pub kind: ElementKind,
    pub type_name: &'src str,
    pub arguments: Vec<Argument<'src>>,
    /// `Some` only when format preservation was enabled for the parse.
    pub format_tokens: Option<Vec<FormatToken<'src>>>,
}

impl<'src> Object<'src> {
    pub fn real(type_name: &'src str) -> Object<'src> {
        Object {
            kind: ElementKind::Real,
            type_name,
            arguments: Vec::new(),
            format_tokens: None,
        }
    }

    pub fn imaginary() -> Object<'src> {
        Object {
            kind: ElementKind::Imaginary,
            type_name: FORMAT_PLACEHOLDER,
            arguments: Vec::new(),
            format_tokens: None,
        }
    }

    #[must_use]
    pub fn is_real(&self) -> bool {
        self.kind == ElementKind::Real
    }

    /// Value of the first argument called `name`.
    ///
    /// Returns `Some(None)` when the argument exists without a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&'src str>> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.value)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'src str>> + 'a {
        self.arguments
            .iter()
            .filter(move |arg| arg.name == name)
            .map(|arg| arg.value)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.arguments.iter().any(|arg| arg.name == name)
    }

    pub(crate) fn push_argument(&mut self, argument: Argument<'src>) {
        self.arguments.push(argument);
    }

    pub(crate) fn append_format(&mut self, tokens: Vec<FormatToken<'src>>) {
        match &mut self.format_tokens {
            Some(existing) => existing.extend(tokens),
            None => self.format_tokens = Some(tokens),
        }
    }
}

/// All objects of one parse, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObjectList<'src> {
    objects: Vec<Object<'src>>,
}

impl<'src> ObjectList<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Object<'src>> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object<'src>> {
        self.objects.iter()
    }

    /// Objects that were actually written in the input.
    pub fn real(&self) -> impl Iterator<Item = &Object<'src>> {
        self.objects.iter().filter(|o| o.is_real())
    }

    pub fn of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Object<'src>> {
        self.real().filter(move |o| o.type_name == type_name)
    }

    pub fn as_slice(&self) -> &[Object<'src>] {
        &self.objects
    }

    pub(crate) fn push(&mut self, object: Object<'src>) {
        self.objects.push(object);
    }

    /// The object attributes attach to, creating the default root object
    /// when no real object has been opened yet.
    pub(crate) fn current_or_root(&mut self, preserve_format: bool) -> &mut Object<'src> {
        if !self.objects.last().is_some_and(Object::is_real) {
            let mut root = Object::real(DEFAULT_ROOT);
            if preserve_format {
                root.format_tokens = Some(Vec::new());
            }
            self.objects.push(root);
        }
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Object<'src>> {
        self.objects.last_mut()
    }
}

impl<'a, 'src> IntoIterator for &'a ObjectList<'src> {
    type Item = &'a Object<'src>;
    type IntoIter = std::slice::Iter<'a, Object<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

impl<'src> IntoIterator for ObjectList<'src> {
    type Item = Object<'src>;
    type IntoIter = std::vec::IntoIter<Object<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}
