//! The documentation model: all sections and keywords, built once.
//!
//! [`DocumentationModel::build`] runs the section pipeline over every
//! configured document, then resolves keyword descriptions. Structural
//! problems in a section document abort the build; keyword problems are
//! collected as diagnostics and leave that keyword's description empty.

use std::time::Instant;

use tracing::{info, instrument};

use docschema_markdown::RenderOptions;
use docschema_shared::{AppConfig, DocumentSpec, Keyword, Result, Section, Variable};

use crate::hierarchy::{append_variables, attach_subsections, rename_root};
use crate::keywords::{ExtractOptions, KeywordDiagnostic, describe_keywords};
use crate::registry;
use crate::sources::DocumentSource;
use crate::tables::extract_sections;

/// Inputs of [`DocumentationModel::build`].
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Section documents, in merge order.
    pub documents: Vec<DocumentSpec>,
    /// Keyword registry; entries without a description get one looked up.
    pub keywords: Vec<Keyword>,
    /// Variables appended to every section with the given name.
    pub extra_variables: Vec<(String, Vec<Variable>)>,
    pub extract: ExtractOptions,
}

impl ModelConfig {
    /// The built-in document set, keyword registry and extra variables.
    pub fn builtin() -> Self {
        Self {
            documents: docschema_shared::default_documents(),
            keywords: registry::builtin_keywords(),
            extra_variables: registry::undocumented_variables(),
            extract: ExtractOptions::default(),
        }
    }

    /// Built-in registry with documents and rendering taken from `config`.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            documents: config.documents.clone(),
            extract: ExtractOptions {
                render: RenderOptions::with_link_base(&config.render.link_base_url)?,
                verbose: config.diagnostics.verbose,
            },
            ..Self::builtin()
        })
    }
}

/// Read-only schema of sections and keywords.
#[derive(Debug)]
pub struct DocumentationModel {
    sections: Vec<Section>,
    keywords: Vec<Keyword>,
    diagnostics: Vec<KeywordDiagnostic>,
}

impl DocumentationModel {
    /// Build the model from `config`, reading documents from `source`.
    #[instrument(skip_all, fields(source = source.name(), documents = config.documents.len()))]
    pub fn build(config: ModelConfig, source: &dyn DocumentSource) -> Result<Self> {
        let start = Instant::now();
        let ModelConfig {
            documents,
            mut keywords,
            extra_variables,
            extract,
        } = config;

        let mut sections = Vec::new();
        for doc in &documents {
            sections.extend(parse_document(doc, source)?);
        }

        for (section_name, variables) in &extra_variables {
            append_variables(&mut sections, section_name, variables);
        }

        let diagnostics = describe_keywords(&mut keywords, source, &extract);

        info!(
            sections = sections.len(),
            keywords = keywords.len(),
            diagnostics = diagnostics.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "documentation model built"
        );

        Ok(Self {
            sections,
            keywords,
            diagnostics,
        })
    }

    /// All sections, flat, in document order. Roots carry their subsections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections with a single-element path.
    pub fn roots(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_root())
    }

    /// First section whose own name is `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// The section with exactly this path.
    pub fn section_by_path(&self, path: &[&str]) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.path.iter().map(String::as_str).eq(path.iter().copied()))
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.name == name)
    }

    /// Keywords whose description could not be resolved, and why.
    pub fn diagnostics(&self) -> &[KeywordDiagnostic] {
        &self.diagnostics
    }
}

/// Sections of one document, hierarchy attached and root renamed.
fn parse_document(doc: &DocumentSpec, source: &dyn DocumentSource) -> Result<Vec<Section>> {
    let document = source.load(&doc.name)?;
    let tree = docschema_markdown::normalize(&document.name, &document.text)?;

    let mut sections = attach_subsections(extract_sections(&tree, doc.heading_root_level)?);
    if let Some(root_name) = &doc.root_name {
        rename_root(&mut sections, root_name);
    }

    info!(document = %doc.name, sections = sections.len(), "document parsed");
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{EmbeddedSource, MemorySource};
    use docschema_shared::DocSchemaError;

    fn builtin_model() -> DocumentationModel {
        DocumentationModel::build(ModelConfig::builtin(), &EmbeddedSource).expect("builtin model")
    }

    fn assert_section_invariants(model: &DocumentationModel) {
        for section in model.sections() {
            assert!(!section.path.is_empty());
            if !section.is_root() {
                assert!(section.subsections.is_empty(), "{:?} owns subsections", section.path);
            }
            for sub in &section.subsections {
                assert_eq!(sub.root_name(), section.root_name());
                assert!(sub.path.len() > 1);
            }
        }
    }

    #[test]
    fn builtin_model_sections() {
        let model = builtin_model();
        assert_section_invariants(&model);

        let general = model.section_by_path(&["General"]).expect("General");
        assert_eq!(general.variables[0].name, "border_size");
        assert_eq!(general.variable("gaps_in").unwrap().default, "5");
        assert_eq!(general.subsections.len(), 1);
        assert_eq!(general.subsections[0].path, vec!["General", "Snap"]);

        let touchpad = model.section("Touchpad").expect("Touchpad");
        assert_eq!(touchpad.path, vec!["Input", "Touchpad"]);
        assert_eq!(touchpad.variable("natural_scroll").unwrap().value_type, "bool");
    }

    #[test]
    fn builtin_model_skips_non_variable_tables() {
        let model = builtin_model();
        assert!(model.section("Variable types").is_none());
        assert!(model.section("Dispatchers").is_none());
        assert!(model.section("Workspace Rules").is_none());
    }

    #[test]
    fn layout_documents_are_merged_under_their_names() {
        let model = builtin_model();

        let master = model.section_by_path(&["Master"]).expect("Master");
        assert_eq!(master.variable("mfact").unwrap().default, "0.55");
        assert!(model.section("Config").is_none());

        let dwindle = model.section_by_path(&["Dwindle"]).expect("Dwindle");
        assert!(dwindle.variable("pseudotile").is_some());

        let roots: Vec<&str> = model.roots().map(|s| s.name()).collect();
        assert_eq!(
            roots,
            vec!["General", "Decoration", "Input", "Misc", "Binds", "Master", "Dwindle"]
        );
    }

    #[test]
    fn undocumented_general_variable_is_appended() {
        let model = builtin_model();
        let general = model.section("General").unwrap();
        let last = general.variables.last().unwrap();
        assert_eq!(last.name, "autogenerated");
        assert_eq!(last.default, "1");
    }

    #[test]
    fn deep_sections_flatten_under_root() {
        let model = builtin_model();
        let decoration = model.section_by_path(&["Decoration"]).unwrap();
        let names: Vec<&str> = decoration.subsections.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Blur", "Shadow"]);
    }

    #[test]
    fn builtin_keywords_are_described() {
        let model = builtin_model();
        assert!(model.diagnostics().is_empty(), "{:?}", model.diagnostics());

        for keyword in model.keywords() {
            assert!(!keyword.description().is_empty(), "{} has no description", keyword.name);
        }

        let exec = model.keyword("exec-once").unwrap();
        assert!(exec.description().contains("exec-once"));
        assert!(!exec.description().contains("Globbing"));

        let env = model.keyword("env").unwrap();
        assert!(env.description().contains("GTK_THEME"));
        assert!(env.description().contains("Caveats"));
        assert!(!env.description().contains("royuan"));

        let bind = model.keyword("bind").unwrap();
        assert!(
            bind.description().contains(
                "### Bind flags\n\n| Flag | Description |\n| --- | --- |\n\
                 | l | locked, will also work when an input inhibitor (e.g. a lockscreen) is active. |\n\
                 | r | release, will trigger on release of a key. |\n\
                 | e | repeat, will repeat when held. |"
            ),
            "{}",
            bind.description()
        );
        assert!(!bind.description().contains("bindm"));

        assert!(model.keyword("$").unwrap().description().starts_with("Defines a variable"));
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let first = builtin_model();
        let second = builtin_model();
        assert_eq!(first.sections(), second.sections());
        assert_eq!(first.keywords(), second.keywords());
    }

    #[test]
    fn structure_error_aborts_build() {
        let source = MemorySource::new().with(
            "Broken",
            "| name | description | type | default |\n|---|---|---|---|\n| a | b | c | d |\n",
        );
        let config = ModelConfig {
            documents: vec![DocumentSpec::new("Broken", 2)],
            keywords: vec![],
            extra_variables: vec![],
            extract: ExtractOptions::default(),
        };

        let err = DocumentationModel::build(config, &source).unwrap_err();
        assert!(matches!(err, DocSchemaError::DocumentStructure { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn keyword_failures_do_not_abort_build() {
        let source = MemorySource::new().with(
            "Doc",
            "## Layout\n\n| name | description | type | default |\n|---|---|---|---|\n| a | b | int | 1 |\n",
        );
        let config = ModelConfig {
            documents: vec![DocumentSpec::new("Doc", 2)],
            keywords: vec![
                Keyword::new("missing-doc", "Nowhere", "x"),
                Keyword::new("missing-heading", "Doc", "nothing-here"),
            ],
            extra_variables: vec![],
            extract: ExtractOptions::default(),
        };

        let model = DocumentationModel::build(config, &source).unwrap();
        assert_eq!(model.sections().len(), 1);
        assert_eq!(model.diagnostics().len(), 2);
        assert!(model.keywords().iter().all(|k| k.description().is_empty()));
    }

    #[test]
    fn nested_table_without_root_table_stays_flat() {
        let source = MemorySource::new().with(
            "Layout",
            "## Layout\n\nIntro.\n\n### sub\n\n\
             | name | description | type | default |\n|---|---|---|---|\n| a | b | int | 1 |\n",
        );
        let config = ModelConfig {
            documents: vec![DocumentSpec::new("Layout", 2)],
            keywords: vec![],
            extra_variables: vec![],
            extract: ExtractOptions::default(),
        };

        let model = DocumentationModel::build(config, &source).unwrap();
        assert_eq!(model.sections().len(), 1);
        assert_eq!(model.sections()[0].path, vec!["Layout", "sub"]);
        assert!(model.sections()[0].subsections.is_empty());
        assert_eq!(model.roots().count(), 0);
        assert!(model.section_by_path(&["Layout"]).is_none());
    }

    #[test]
    fn root_override_merges_documents() {
        let table = "| name | description | type | default |\n|---|---|---|---|\n";
        let source = MemorySource::new()
            .with("One", format!("## Config\n\n{table}| a | x | int | 1 |\n\n### Rules\n\n{table}| b | y | int | 2 |\n"))
            .with("Two", format!("## Config\n\n{table}| c | z | int | 3 |\n"));
        let config = ModelConfig {
            documents: vec![
                DocumentSpec::new("One", 2).with_root_name("First"),
                DocumentSpec::new("Two", 2).with_root_name("Second"),
            ],
            keywords: vec![],
            extra_variables: vec![],
            extract: ExtractOptions::default(),
        };

        let model = DocumentationModel::build(config, &source).unwrap();
        let paths: Vec<String> = model.sections().iter().map(|s| s.path.join("/")).collect();
        assert_eq!(paths, vec!["First", "First/Rules", "Second"]);
        assert_eq!(
            model.section_by_path(&["First"]).unwrap().subsections[0].path,
            vec!["First", "Rules"]
        );
        assert_section_invariants(&model);
    }

    #[test]
    fn config_driven_model() {
        let mut app = AppConfig::default();
        app.documents = vec![DocumentSpec::new("Dwindle-Layout", 2)];
        app.diagnostics.verbose = true;

        let config = ModelConfig::from_app_config(&app).unwrap();
        assert!(config.extract.verbose);
        assert!(config.extract.render.link_base_url.is_some());

        let model = DocumentationModel::build(config, &EmbeddedSource).unwrap();
        assert_eq!(model.sections().len(), 1);
        assert_eq!(model.sections()[0].name(), "Config");
    }
}
