//! Narrative (markdown) and stub (LuaLS definition) rendering.
//!
//! Both formats are pure functions of the model and a [`RenderContext`], so
//! rendering the same registry twice produces identical text.

use std::collections::HashSet;

use crate::LuadocError;
use crate::LuadocResult;
use crate::config::DocConfig;
use crate::error::DuplicateField;
use crate::model::ApiRegistry;
use crate::model::Class;
use crate::model::Constructor;
use crate::model::Field;
use crate::model::Function;
use crate::model::Owner;
use crate::model::Parameter;
use crate::model::Table;
use crate::model::UNSET_FUNCTION_NAME;

/// Output format of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocFormat {
	/// Human-readable markdown reference page.
	Narrative,
	/// Type-annotated Lua definition file for the Lua language server.
	Stub,
}

impl DocFormat {
	pub const ALL: [Self; 2] = [Self::Narrative, Self::Stub];

	pub fn extension(self) -> &'static str {
		match self {
			Self::Narrative => "md",
			Self::Stub => "lua",
		}
	}

	pub fn renderer(self) -> &'static dyn Renderer {
		match self {
			Self::Narrative => &NarrativeRenderer,
			Self::Stub => &StubRenderer,
		}
	}
}

/// Renders tables and classes into one output format.
pub trait Renderer {
	fn table(&self, table: &Table, ctx: &RenderContext<'_>) -> String;
	fn class(&self, class: &Class, ctx: &RenderContext<'_>) -> String;
}

/// Naming rules shared by both formats.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
	namespace: Option<&'a str>,
	global_table_marker: &'a str,
	namespace_placeholder: &'a str,
}

impl<'a> RenderContext<'a> {
	pub fn new(namespace: Option<&'a str>, config: &'a DocConfig) -> Self {
		Self {
			namespace: namespace.filter(|ns| !ns.is_empty()),
			global_table_marker: &config.global_table_marker,
			namespace_placeholder: &config.namespace_placeholder,
		}
	}

	pub fn from_registry(registry: &'a ApiRegistry, config: &'a DocConfig) -> Self {
		Self::new(registry.namespace(), config)
	}

	pub fn namespace(&self) -> Option<&'a str> {
		self.namespace
	}

	/// Whether a table is the designated global table.
	pub fn is_global(&self, table_name: &str) -> bool {
		!self.global_table_marker.is_empty() && table_name.contains(self.global_table_marker)
	}

	/// Prefix `name` with the namespace, when one is set.
	pub fn qualify(&self, name: &str) -> String {
		match self.namespace {
			Some(namespace) => format!("{namespace}.{name}"),
			None => name.to_string(),
		}
	}

	/// Qualified name of a table; the global table stays unqualified.
	pub fn qualify_table(&self, name: &str) -> String {
		if self.is_global(name) {
			name.to_string()
		} else {
			self.qualify(name)
		}
	}

	fn is_global_owner(&self, owner: &Owner) -> bool {
		matches!(owner, Owner::Table(name) if self.is_global(name))
	}

	/// The expression used to call `function`, e.g. `rom.log.info` or
	/// `rom.config.config_file:get`. Functions on the global table are called
	/// by their bare name.
	pub fn call_path(&self, function: &Function) -> String {
		if self.is_global_owner(&function.owner) {
			return function.name.clone();
		}
		format!(
			"{}{}{}",
			self.qualify(function.owner.name()),
			function.owner.member_separator(),
			function.name
		)
	}

	/// Qualify unqualified mentions of `function` (`log.info`) inside its own
	/// description.
	fn qualify_mentions(&self, function: &Function, text: &str) -> String {
		if self.namespace.is_none() || self.is_global_owner(&function.owner) {
			return text.to_string();
		}
		let short = format!(
			"{}{}{}",
			function.owner.name(),
			function.owner.member_separator(),
			function.name
		);
		text.replace(&short, &self.call_path(function))
	}

	/// Replace the namespace placeholder token. Without a namespace the token
	/// and the `.` following it are removed.
	pub fn substitute_placeholder(&self, text: &str) -> String {
		if self.namespace_placeholder.is_empty() {
			return text.to_string();
		}
		match self.namespace {
			Some(namespace) => text.replace(self.namespace_placeholder, namespace),
			None => text.replace(&format!("{}.", self.namespace_placeholder), ""),
		}
	}
}

/// Line-oriented text assembly.
#[derive(Debug, Default)]
pub struct DocBuilder {
	out: String,
}

impl DocBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append `text` followed by a newline.
	pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
		self.out.push_str(text.as_ref());
		self.out.push('\n');
		self
	}

	pub fn blank(&mut self) -> &mut Self {
		self.out.push('\n');
		self
	}

	/// Append `text` and a blank line, unless `text` is empty.
	pub fn paragraph(&mut self, text: &str) -> &mut Self {
		if !text.is_empty() {
			self.line(text).blank();
		}
		self
	}

	/// Append `text` as Lua `--` comment lines, unless `text` is empty.
	pub fn lua_comment(&mut self, text: &str) -> &mut Self {
		if text.is_empty() {
			return self;
		}
		for line in text.split('\n') {
			if line.is_empty() {
				self.line("--");
			} else {
				self.line(format!("-- {line}"));
			}
		}
		self
	}

	pub fn finish(self) -> String {
		self.out
	}
}

fn parameter_list(parameters: &[Parameter]) -> String {
	parameters
		.iter()
		.map(|parameter| parameter.name.as_str())
		.collect::<Vec<_>>()
		.join(", ")
}

/// Collapse a multi-line description into one line.
fn single_line(text: &str) -> String {
	text.split('\n')
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Markdown reference pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeRenderer;

impl NarrativeRenderer {
	fn field(doc: &mut DocBuilder, field: &Field) {
		doc.line(format!("### `{}`", field.name)).blank();
		doc.paragraph(&field.description);
		if !field.r#type.is_empty() {
			doc.line(format!("- Type: `{}`", field.r#type));
		}
		doc.blank();
	}

	fn parameters(doc: &mut DocBuilder, parameters: &[Parameter]) {
		if parameters.is_empty() {
			return;
		}
		doc.line("- **Parameters:**");
		for parameter in parameters {
			if parameter.description.is_empty() {
				doc.line(format!("  - `{}` ({})", parameter.name, parameter.r#type));
			} else {
				doc.line(format!(
					"  - `{}` ({}): {}",
					parameter.name, parameter.r#type, parameter.description
				));
			}
		}
		doc.blank();
	}

	fn example(doc: &mut DocBuilder, call: &str) {
		doc.line("**Example Usage:**")
			.line("```lua")
			.line(call)
			.line("```")
			.blank();
	}

	fn constructor(doc: &mut DocBuilder, constructor: &Constructor, ctx: &RenderContext<'_>) {
		let parameters = parameter_list(&constructor.parameters);
		doc.line(format!("### `new({parameters})`")).blank();
		doc.paragraph(&constructor.description);
		Self::parameters(doc, &constructor.parameters);
		Self::example(
			doc,
			&format!(
				"myInstance = {}:new({parameters})",
				ctx.qualify(&constructor.class)
			),
		);
	}

	fn function(doc: &mut DocBuilder, function: &Function, ctx: &RenderContext<'_>) {
		let parameters = parameter_list(&function.parameters);
		doc.line(format!("### `{}({parameters})`", function.name))
			.blank();
		doc.paragraph(&ctx.qualify_mentions(function, &function.description));
		Self::parameters(doc, &function.parameters);

		let return_type = function.declared_return_type();
		if let Some(return_type) = return_type {
			doc.line("- **Returns:**")
				.line(format!(
					"  - `{return_type}`: {}",
					function.return_description
				))
				.blank();
		}

		let call = format!("{}({parameters})", ctx.call_path(function));
		let call = match return_type {
			Some(return_type) => format!("{return_type} = {call}"),
			None => call,
		};
		Self::example(doc, &call);
	}

	fn fields(doc: &mut DocBuilder, fields: &[Field]) {
		if fields.is_empty() {
			return;
		}
		doc.line(format!("## Fields ({})", fields.len())).blank();
		for field in fields {
			Self::field(doc, field);
		}
	}

	fn functions(doc: &mut DocBuilder, functions: &[Function], ctx: &RenderContext<'_>) {
		if functions.is_empty() {
			return;
		}
		doc.line(format!("## Functions ({})", functions.len()))
			.blank();
		for function in functions {
			Self::function(doc, function, ctx);
		}
		doc.blank();
	}
}

impl Renderer for NarrativeRenderer {
	fn table(&self, table: &Table, ctx: &RenderContext<'_>) -> String {
		let mut doc = DocBuilder::new();
		doc.line(format!("# Table: {}", ctx.qualify_table(&table.name)))
			.blank();
		doc.paragraph(&table.description);
		Self::fields(&mut doc, &table.fields);
		Self::functions(&mut doc, &table.functions, ctx);
		ctx.substitute_placeholder(&doc.finish())
	}

	fn class(&self, class: &Class, ctx: &RenderContext<'_>) -> String {
		let mut doc = DocBuilder::new();
		doc.line(format!("# Class: {}", ctx.qualify(&class.name)))
			.blank();

		if !class.inheritance.is_empty() {
			doc.line(format!(
				"## Inherit from {} class: {}",
				class.inheritance.len(),
				class.inheritance.join(", ")
			))
			.blank();
		}

		doc.paragraph(&class.description);
		Self::fields(&mut doc, &class.fields);

		if !class.constructors.is_empty() {
			doc.line(format!("## Constructors ({})", class.constructors.len()))
				.blank();
			for constructor in &class.constructors {
				Self::constructor(&mut doc, constructor, ctx);
			}
		}

		Self::functions(&mut doc, &class.functions, ctx);
		ctx.substitute_placeholder(&doc.finish())
	}
}

/// LuaLS `---@meta` definition files.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubRenderer;

impl StubRenderer {
	fn field(doc: &mut DocBuilder, field: &Field) {
		let mut line = format!("---@field {}", field.name);
		if !field.r#type.is_empty() {
			line.push(' ');
			line.push_str(&field.r#type);
		}
		let description = single_line(&field.description);
		if !description.is_empty() {
			line.push_str(" # ");
			line.push_str(&description);
		}
		doc.line(line);
	}

	fn parameters(doc: &mut DocBuilder, parameters: &[Parameter]) {
		for parameter in parameters {
			if parameter.description.is_empty() {
				doc.line(format!("---@param {} {}", parameter.name, parameter.r#type));
			} else {
				doc.line(format!(
					"---@param {} {} {}",
					parameter.name, parameter.r#type, parameter.description
				));
			}
		}
	}

	fn constructor(doc: &mut DocBuilder, constructor: &Constructor, ctx: &RenderContext<'_>) {
		let class = ctx.qualify(&constructor.class);
		doc.lua_comment(&constructor.description);
		Self::parameters(doc, &constructor.parameters);
		doc.line(format!("---@return {class}")).line(format!(
			"function {class}:new({}) end",
			parameter_list(&constructor.parameters)
		));
	}

	fn function(doc: &mut DocBuilder, function: &Function, ctx: &RenderContext<'_>) {
		doc.lua_comment(&ctx.qualify_mentions(function, &function.description));
		Self::parameters(doc, &function.parameters);
		if let Some(return_type) = function.declared_return_type() {
			doc.line(format!(
				"---@return {return_type} # {}",
				function.return_description
			));
		}
		doc.line(format!(
			"function {}({}) end",
			ctx.call_path(function),
			parameter_list(&function.parameters)
		))
		.blank();
	}

	fn header(doc: &mut DocBuilder, name: &str, description: &str) {
		doc.line(format!("---@meta {name}")).blank();
		doc.lua_comment(description);
	}

	fn functions(doc: &mut DocBuilder, functions: &[Function], ctx: &RenderContext<'_>) {
		if functions.is_empty() {
			return;
		}
		for function in functions {
			Self::function(doc, function, ctx);
		}
		doc.blank();
	}
}

impl Renderer for StubRenderer {
	fn table(&self, table: &Table, ctx: &RenderContext<'_>) -> String {
		let mut doc = DocBuilder::new();
		Self::header(&mut doc, &table.name, &table.description);
		doc.line(format!(
			"---@class (exact) {}",
			ctx.qualify_table(&table.name)
		));
		for field in &table.fields {
			Self::field(&mut doc, field);
		}
		doc.blank();
		Self::functions(&mut doc, &table.functions, ctx);
		ctx.substitute_placeholder(&doc.finish())
	}

	fn class(&self, class: &Class, ctx: &RenderContext<'_>) -> String {
		let mut doc = DocBuilder::new();
		Self::header(&mut doc, &class.name, &class.description);

		let mut declaration = format!("---@class (exact) {}", ctx.qualify(&class.name));
		if !class.inheritance.is_empty() {
			declaration.push_str(": ");
			declaration.push_str(&class.inheritance.join(", "));
		}
		doc.line(declaration);

		if class.fields.is_empty() {
			doc.blank();
		}
		for field in &class.fields {
			Self::field(&mut doc, field);
		}
		doc.blank();

		if class.constructors.is_empty() {
			doc.blank();
		}
		for constructor in &class.constructors {
			Self::constructor(&mut doc, constructor, ctx);
		}
		doc.blank();

		Self::functions(&mut doc, &class.functions, ctx);
		ctx.substitute_placeholder(&doc.finish())
	}
}

/// Fields whose name repeats an earlier field of the same owner.
pub fn find_duplicate_fields(owner: &str, fields: &[Field]) -> Vec<DuplicateField> {
	let mut seen = HashSet::new();
	fields
		.iter()
		.filter(|field| !seen.insert(field.name.as_str()))
		.map(|field| DuplicateField {
			owner: owner.to_string(),
			field: field.clone(),
		})
		.collect()
}

/// Check the registry before anything is rendered.
///
/// Duplicate field names on any table or class are fatal and reported
/// together. Functions that never received a name and inherited classes
/// unknown to the registry only produce warnings.
pub fn validate_registry(registry: &ApiRegistry) -> LuadocResult<()> {
	let mut duplicates = Vec::new();

	for table in registry.tables() {
		duplicates.extend(find_duplicate_fields(
			&format!("table `{}`", table.name),
			&table.fields,
		));
	}

	for class in registry.classes() {
		duplicates.extend(find_duplicate_fields(
			&format!("class `{}`", class.name),
			&class.fields,
		));

		for parent in &class.inheritance {
			if registry.class(parent).is_none() {
				tracing::warn!(class = %class.name, parent = %parent, "inherits from an undocumented class");
			}
		}
	}

	let unnamed = registry
		.tables()
		.iter()
		.flat_map(|table| &table.functions)
		.chain(registry.classes().iter().flat_map(|class| &class.functions))
		.filter(|function| function.name == UNSET_FUNCTION_NAME);
	for function in unnamed {
		tracing::warn!(owner = %function.owner, "function block has no `Name:` line");
	}

	if duplicates.is_empty() {
		Ok(())
	} else {
		Err(LuadocError::DuplicateFields(duplicates))
	}
}
