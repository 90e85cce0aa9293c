use std::fmt;
use std::path::Path;

use crate::LuadocError;
use crate::LuadocResult;
use crate::config::COMMENT_MARKER;
use crate::config::SEPARATOR;
use crate::model::ApiRegistry;
use crate::model::Constructor;
use crate::model::Field;
use crate::model::Function;
use crate::model::FunctionRef;
use crate::model::Owner;
use crate::model::Parameter;

/// The kind of entity an annotation block documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
	Table,
	Class,
	Field,
	Constructor,
	Function,
	Namespace,
}

impl DocKind {
	/// Parse the value of an annotation header, e.g. the `Function` in
	/// `// Lua API: Function`. Case and surrounding whitespace are ignored.
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_lowercase().as_str() {
			"table" => Some(Self::Table),
			"class" => Some(Self::Class),
			"field" => Some(Self::Field),
			"constructor" => Some(Self::Constructor),
			"function" => Some(Self::Function),
			"namespace" => Some(Self::Namespace),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Table => "table",
			Self::Class => "class",
			Self::Field => "field",
			Self::Constructor => "constructor",
			Self::Function => "function",
			Self::Namespace => "namespace",
		}
	}

	/// The tag that must open a block of this kind before anything else.
	fn owner_hint(self) -> &'static str {
		match self {
			Self::Table | Self::Class | Self::Namespace => "`Name: <name>`",
			Self::Field | Self::Function => "`Table: <name>` or `Class: <name>`",
			Self::Constructor => "`Class: <name>`",
		}
	}
}

impl fmt::Display for DocKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRef {
	Table { table: usize, field: usize },
	Class { class: usize, field: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConstructorRef {
	class: usize,
	constructor: usize,
}

/// Parser state carried from one line to the next.
///
/// Each variant names the active block kind and, once its owner tag has been
/// seen, the entity that subsequent lines of the block add to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Cursor {
	#[default]
	Inactive,
	Table(Option<usize>),
	Class(Option<usize>),
	Field(Option<FieldRef>),
	Constructor(Option<ConstructorRef>),
	Function(Option<FunctionRef>),
	Namespace,
}

impl Cursor {
	fn start(kind: DocKind) -> Self {
		match kind {
			DocKind::Table => Self::Table(None),
			DocKind::Class => Self::Class(None),
			DocKind::Field => Self::Field(None),
			DocKind::Constructor => Self::Constructor(None),
			DocKind::Function => Self::Function(None),
			DocKind::Namespace => Self::Namespace,
		}
	}

	fn kind(self) -> Option<DocKind> {
		match self {
			Self::Inactive => None,
			Self::Table(_) => Some(DocKind::Table),
			Self::Class(_) => Some(DocKind::Class),
			Self::Field(_) => Some(DocKind::Field),
			Self::Constructor(_) => Some(DocKind::Constructor),
			Self::Function(_) => Some(DocKind::Function),
			Self::Namespace => Some(DocKind::Namespace),
		}
	}
}

/// Feeds the comment lines of one source file into an [`ApiRegistry`].
pub struct ModelBuilder<'a> {
	registry: &'a mut ApiRegistry,
	file: &'a Path,
	cursor: Cursor,
	line: usize,
}

impl<'a> ModelBuilder<'a> {
	pub fn new(registry: &'a mut ApiRegistry, file: &'a Path) -> Self {
		Self {
			registry,
			file,
			cursor: Cursor::Inactive,
			line: 0,
		}
	}

	/// Open a new block of `kind`. Nothing from the previous block carries
	/// over.
	pub fn begin(&mut self, kind: DocKind) {
		self.cursor = Cursor::start(kind);
	}

	/// Close the current block.
	pub fn end(&mut self) {
		self.cursor = Cursor::Inactive;
	}

	pub fn active_kind(&self) -> Option<DocKind> {
		self.cursor.kind()
	}

	/// Dispatch one trimmed comment line (1-indexed `line_number`) to the
	/// handler of the active block. Lines outside a block are ignored.
	pub fn handle_line(&mut self, line: &str, line_number: usize) -> LuadocResult<()> {
		self.line = line_number;
		let lower = line.to_lowercase();

		match self.cursor {
			Cursor::Inactive => Ok(()),
			Cursor::Table(current) => self.table_line(current, line, &lower),
			Cursor::Class(current) => self.class_line(current, line, &lower),
			Cursor::Field(current) => self.field_line(current, line, &lower),
			Cursor::Constructor(current) => self.constructor_line(current, line, &lower),
			Cursor::Function(current) => self.function_line(current, line, &lower),
			Cursor::Namespace => {
				if has_tag(&lower, "name") {
					self.registry.set_namespace(tag_value(line));
				}
				Ok(())
			}
		}
	}

	fn missing_owner(&self) -> LuadocError {
		let kind = self.cursor.kind().unwrap_or(DocKind::Table);
		LuadocError::MissingOwner {
			kind: kind.to_string(),
			expected: kind.owner_hint().to_string(),
			file: self.file.display().to_string(),
			line: self.line,
		}
	}

	fn table_line(&mut self, current: Option<usize>, line: &str, lower: &str) -> LuadocResult<()> {
		if has_tag(lower, "name") {
			let index = self.registry.table_entry(tag_value(line));
			self.cursor = Cursor::Table(Some(index));
			return Ok(());
		}

		let index = current.ok_or_else(|| self.missing_owner())?;
		self.registry
			.table_mut(index)
			.description
			.push_line(&sanitize_description(line));
		Ok(())
	}

	fn class_line(&mut self, current: Option<usize>, line: &str, lower: &str) -> LuadocResult<()> {
		if has_tag(lower, "name") {
			let index = self.registry.class_entry(tag_value(line));
			self.cursor = Cursor::Class(Some(index));
			return Ok(());
		}

		let index = current.ok_or_else(|| self.missing_owner())?;
		let class = self.registry.class_mut(index);
		if has_tag(lower, "inherit") {
			let parent = tag_value(line);
			if !class.inherit(parent) {
				tracing::debug!(class = %class.name, parent, "ignoring repeated inheritance");
			}
		} else {
			class.description.push_line(&sanitize_description(line));
		}
		Ok(())
	}

	fn field_line(&mut self, current: Option<FieldRef>, line: &str, lower: &str) -> LuadocResult<()> {
		if has_tag(lower, "table") {
			let table = self.registry.table_entry(tag_value(line));
			let fields = &mut self.registry.table_mut(table).fields;
			fields.push(Field::default());
			self.cursor = Cursor::Field(Some(FieldRef::Table {
				table,
				field: fields.len() - 1,
			}));
			return Ok(());
		}

		if has_tag(lower, "class") {
			let class = self.registry.class_entry(tag_value(line));
			let fields = &mut self.registry.class_mut(class).fields;
			fields.push(Field::default());
			self.cursor = Cursor::Field(Some(FieldRef::Class {
				class,
				field: fields.len() - 1,
			}));
			return Ok(());
		}

		let location = current.ok_or_else(|| self.missing_owner())?;
		let field = match location {
			FieldRef::Table { table, field } => &mut self.registry.table_mut(table).fields[field],
			FieldRef::Class { class, field } => &mut self.registry.class_mut(class).fields[field],
		};

		if has_tag(lower, "field") {
			let [name, r#type] = tag_values::<2>(line);
			field.name = name.to_string();
			field.r#type = r#type.to_string();
		} else {
			field.description.push_line(&sanitize_description(line));
		}
		Ok(())
	}

	fn constructor_line(
		&mut self,
		current: Option<ConstructorRef>,
		line: &str,
		lower: &str,
	) -> LuadocResult<()> {
		if has_tag(lower, "class") {
			let class_index = self.registry.class_entry(tag_value(line));
			let class = self.registry.class_mut(class_index);
			class.constructors.push(Constructor {
				class: class.name.clone(),
				parameters: Vec::new(),
				description: Default::default(),
			});
			self.cursor = Cursor::Constructor(Some(ConstructorRef {
				class: class_index,
				constructor: class.constructors.len() - 1,
			}));
			return Ok(());
		}

		let location = current.ok_or_else(|| self.missing_owner())?;
		let constructor =
			&mut self.registry.class_mut(location.class).constructors[location.constructor];

		if has_tag(lower, "param") {
			constructor.parameters.push(parse_parameter(line));
		} else {
			constructor
				.description
				.push_line(&sanitize_description(line));
		}
		Ok(())
	}

	fn function_line(
		&mut self,
		current: Option<FunctionRef>,
		line: &str,
		lower: &str,
	) -> LuadocResult<()> {
		if has_tag(lower, "table") {
			let table = self.registry.table_entry(tag_value(line));
			let owner = Owner::Table(self.registry.table_mut(table).name.clone());
			let functions = &mut self.registry.table_mut(table).functions;
			functions.push(Function::new(owner));
			self.cursor = Cursor::Function(Some(FunctionRef::Table {
				table,
				function: functions.len() - 1,
			}));
			return Ok(());
		}

		if has_tag(lower, "class") {
			let class = self.registry.class_entry(tag_value(line));
			let owner = Owner::Class(self.registry.class_mut(class).name.clone());
			let functions = &mut self.registry.class_mut(class).functions;
			functions.push(Function::new(owner));
			self.cursor = Cursor::Function(Some(FunctionRef::Class {
				class,
				function: functions.len() - 1,
			}));
			return Ok(());
		}

		let location = current.ok_or_else(|| self.missing_owner())?;

		if has_tag(lower, "name") {
			let name = tag_value(line).to_string();
			self.registry.index_function(&name, location);
			self.registry.function_mut(location).name = name;
			return Ok(());
		}

		let file = self.file;
		let line_number = self.line;
		let function = self.registry.function_mut(location);

		if has_tag(lower, "param") {
			function.parameters.push(parse_parameter(line));
		} else if has_tag(lower, "return") {
			let segments = tag_segments(line, 2);
			if let Some(return_type) = segments.first() {
				function.return_type = Some((*return_type).to_string());
			}
			if let Some(description) = segments.get(1) {
				function.return_description = (*description).to_string();
			} else {
				tracing::warn!(
					file = %file.display(),
					line = line_number,
					function = %function.name,
					"return annotation has no description; expected `Return: <type>: <description>`"
				);
			}
		} else {
			function
				.description
				.push_line(&sanitize_description(line));
		}
		Ok(())
	}
}

/// Strip one leading comment marker and, when exactly one space follows it,
/// that space too. Additional indentation is preserved. Trailing whitespace
/// is always removed.
pub fn sanitize_description(line: &str) -> String {
	let text = match line.strip_prefix(COMMENT_MARKER) {
		Some(rest) => match rest.strip_prefix(' ') {
			Some(after) if !after.starts_with(' ') => after,
			_ => rest,
		},
		None => line,
	};
	text.trim_end().to_string()
}

/// Whether a lowercased comment line carries `tag`, e.g. `// Returns: x`
/// carries `return`.
fn has_tag(lower: &str, tag: &str) -> bool {
	lower.contains(SEPARATOR) && lower.replace(COMMENT_MARKER, "").trim().starts_with(tag)
}

/// Everything after the first separator, trimmed.
fn tag_value(line: &str) -> &str {
	line.split_once(SEPARATOR)
		.map_or("", |(_, value)| value.trim())
}

/// Up to `count` trimmed segments following the tag. The last segment keeps
/// any further separators.
fn tag_segments(line: &str, count: usize) -> Vec<&str> {
	line.splitn(count + 1, SEPARATOR)
		.skip(1)
		.map(str::trim)
		.collect()
}

/// Exactly `N` segments following the tag, missing ones left empty.
fn tag_values<const N: usize>(line: &str) -> [&str; N] {
	let mut values = [""; N];
	for (slot, segment) in values.iter_mut().zip(tag_segments(line, N)) {
		*slot = segment;
	}
	values
}

fn parse_parameter(line: &str) -> Parameter {
	let [name, r#type, description] = tag_values::<3>(line);
	Parameter {
		name: name.to_string(),
		r#type: r#type.to_string(),
		description: description.to_string(),
	}
}
