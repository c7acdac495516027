//! Workload generators: complete synthetic project trees at three scales.
//!
//! Each generator materializes a self-describing TypeScript project: a
//! schema copy, a literal Generator config, and a `src/` tree whose files
//! embed GraphQL operations in tagged template literals. Files are written
//! in a fixed traversal order (module × family × index) and all variation
//! flows through the fixed-seed PRNG, so two runs produce byte-identical
//! trees.

use crate::error::{Error, Result};
use crate::fixtures;
use rand::rngs::StdRng;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The config file the Generator reads, written verbatim into every
/// workload. The harness never parses it.
pub const CONFIG_FILE_NAME: &str = "graphql-go-gen.yaml";

const CONFIG_YAML: &str = r#"schema: schema.graphql
documents:
  include:
    - "src/**/*.ts"
    - "src/**/*.tsx"
  exclude:
    - "src/**/*.test.ts"
    - "src/**/*.spec.ts"
generates:
  src/generated/graphql.ts:
    plugins:
      - typescript
      - typescript-operations
      - typed-document-node
scalars:
  DateTime: string
  JSON: any
"#;

/// Relative path of the artifact the Generator must produce.
pub const EXPECTED_ARTIFACT: &str = "src/generated/graphql.ts";

/// Counters accumulated while a workload is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadStats {
    /// Files written.
    pub file_count: u64,
    /// GraphQL tagged literals emitted across all files.
    pub tag_count: u64,
    /// Newline count across all written files.
    pub total_loc: u64,
}

/// Count tag occurrences per the textual rule: `` gql` `` or the
/// `` /* GraphQL */` `` sentinel, anywhere in the file.
#[must_use]
pub fn count_tags(content: &str) -> u64 {
    let gql = content.matches("gql`").count();
    let sentinel = content.matches("/* GraphQL */`").count();
    (gql + sentinel) as u64
}

#[must_use]
fn count_lines(content: &str) -> u64 {
    content.bytes().filter(|b| *b == b'\n').count() as u64
}

/// Write one workload file, creating parent directories, and fold it into
/// the stats.
pub fn write_file(path: &Path, content: &str, stats: &mut WorkloadStats) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    stats.file_count += 1;
    stats.tag_count += count_tags(content);
    stats.total_loc += count_lines(content);
    Ok(())
}

/// Scale parameters for one workload tier.
#[derive(Debug, Clone, Copy)]
pub struct ProjectShape {
    pub modules: usize,
    pub components_per_module: usize,
    pub services_per_module: usize,
    pub hooks_per_module: usize,
    pub utils_per_module: usize,
    pub shared_components: usize,
    pub fragment_files: usize,
    pub query_files: usize,
    pub mutation_files: usize,
    pub subscription_files: usize,
    pub extra_entry_points: usize,
    /// Probability that a component embeds a query.
    pub query_probability: f64,
    /// Probability that a component embeds a mutation.
    pub mutation_probability: f64,
    /// Probability that a component embeds a subscription.
    pub subscription_probability: f64,
}

impl ProjectShape {
    #[must_use]
    pub const fn tiny() -> Self {
        Self {
            modules: 2,
            components_per_module: 10,
            services_per_module: 3,
            hooks_per_module: 3,
            utils_per_module: 2,
            shared_components: 5,
            fragment_files: 5,
            query_files: 8,
            mutation_files: 5,
            subscription_files: 0,
            extra_entry_points: 0,
            query_probability: 0.50,
            mutation_probability: 0.25,
            subscription_probability: 0.0,
        }
    }

    #[must_use]
    pub const fn mid() -> Self {
        Self {
            modules: 10,
            components_per_module: 150,
            services_per_module: 20,
            hooks_per_module: 15,
            utils_per_module: 10,
            shared_components: 50,
            fragment_files: 30,
            query_files: 40,
            mutation_files: 30,
            subscription_files: 0,
            extra_entry_points: 0,
            query_probability: 0.60,
            mutation_probability: 0.30,
            subscription_probability: 0.05,
        }
    }

    #[must_use]
    pub const fn large() -> Self {
        Self {
            modules: 50,
            components_per_module: 300,
            services_per_module: 50,
            hooks_per_module: 30,
            utils_per_module: 20,
            shared_components: 200,
            fragment_files: 100,
            query_files: 150,
            mutation_files: 100,
            subscription_files: 50,
            extra_entry_points: 4,
            query_probability: 0.70,
            mutation_probability: 0.40,
            subscription_probability: 0.10,
        }
    }
}

/// One named benchmark scenario.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub shape: ProjectShape,
}

/// Built-in scenario set, in declared execution order.
pub const SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "tiny-ts",
        shape: ProjectShape::tiny(),
    },
    Scenario {
        name: "mid-ts",
        shape: ProjectShape::mid(),
    },
    Scenario {
        name: "large-ts",
        shape: ProjectShape::large(),
    },
];

/// Map a `--test-set` value onto scenarios. `None` means the value is
/// unknown.
#[must_use]
pub fn select_scenarios(test_set: &str) -> Option<Vec<Scenario>> {
    match test_set {
        "all" => Some(SCENARIOS.to_vec()),
        "tiny" | "tiny-ts" => Some(vec![SCENARIOS[0]]),
        "mid" | "mid-ts" => Some(vec![SCENARIOS[1]]),
        "large" | "large-ts" => Some(vec![SCENARIOS[2]]),
        _ => None,
    }
}

const MODULE_NAMES: &[&str] = &[
    "accounts", "billing", "catalog", "inventory", "orders", "payments", "profiles", "reports",
    "search", "settings", "shipping", "support", "analytics", "campaigns", "reviews",
];

fn module_name(index: usize) -> String {
    let base = MODULE_NAMES[index % MODULE_NAMES.len()];
    let round = index / MODULE_NAMES.len();
    if round == 0 {
        base.to_string()
    } else {
        format!("{base}{}", round + 1)
    }
}

fn pascal(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        if ch == '-' || ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Generates one complete workload tree.
pub struct WorkloadGenerator {
    shape: ProjectShape,
    schema_src: PathBuf,
    rng: StdRng,
    stats: WorkloadStats,
}

impl WorkloadGenerator {
    #[must_use]
    pub fn new(shape: ProjectShape, schema_src: PathBuf) -> Self {
        Self {
            shape,
            schema_src,
            rng: fixtures::seeded_rng(),
            stats: WorkloadStats::default(),
        }
    }

    /// Materialize the tree under `dir` and return the final stats.
    pub fn generate(mut self, dir: &Path) -> Result<WorkloadStats> {
        let schema = fs::read_to_string(&self.schema_src).map_err(|e| {
            Error::setup(format!(
                "cannot read schema {}: {e}",
                self.schema_src.display()
            ))
        })?;
        write_file(&dir.join("schema.graphql"), &schema, &mut self.stats)?;
        write_file(&dir.join(CONFIG_FILE_NAME), CONFIG_YAML, &mut self.stats)?;

        for module_idx in 0..self.shape.modules {
            self.generate_module(dir, module_idx)?;
        }
        self.generate_shared(dir)?;
        self.generate_operations(dir)?;
        self.generate_entry_points(dir)?;

        debug!(
            files = self.stats.file_count,
            tags = self.stats.tag_count,
            loc = self.stats.total_loc,
            "workload complete"
        );
        Ok(self.stats)
    }

    fn generate_module(&mut self, dir: &Path, module_idx: usize) -> Result<()> {
        let module = module_name(module_idx);
        let module_pascal = pascal(&module);
        let root = dir.join("src/modules").join(&module);

        for i in 0..self.shape.components_per_module {
            let suffix = fixtures::choose(&mut self.rng, fixtures::COMPONENT_SUFFIXES);
            let name = format!("{module_pascal}{suffix}{i}");
            let content = self.component(&name);
            write_file(
                &root.join("components").join(format!("{name}.tsx")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.services_per_module {
            let name = format!("{module_pascal}Service{i}");
            let content = self.service(&name);
            write_file(
                &root.join("services").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.hooks_per_module {
            let name = format!("{module_pascal}Data{i}");
            let content = self.hook(&name);
            write_file(
                &root.join("hooks").join(format!("use{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.utils_per_module {
            let name = format!("{module_pascal}Util{i}");
            let is_complex = self.rng.random_bool(0.3);
            let content = fixtures::util_file(&name, is_complex);
            write_file(
                &root.join("utils").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        Ok(())
    }

    fn generate_shared(&mut self, dir: &Path) -> Result<()> {
        let root = dir.join("src/shared/components");
        for i in 0..self.shape.shared_components {
            let family = fixtures::choose(&mut self.rng, fixtures::WIDGET_FAMILIES);
            let suffix = fixtures::choose(&mut self.rng, fixtures::COMPONENT_SUFFIXES);
            let name = format!("Shared{family}{suffix}{i}");
            let content = self.component(&name);
            write_file(&root.join(format!("{name}.tsx")), &content, &mut self.stats)?;
        }
        Ok(())
    }

    fn generate_operations(&mut self, dir: &Path) -> Result<()> {
        let root = dir.join("src/graphql");

        for i in 0..self.shape.fragment_files {
            let name = format!("Fragment{i}Fields");
            let content = operation_file(&fixtures::fragment(&mut self.rng, &name));
            write_file(
                &root.join("fragments").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.query_files {
            let name = format!("StandaloneQuery{i}");
            let complexity = self.rng.random_range(0..=2);
            let content = operation_file(&fixtures::query(&mut self.rng, &name, complexity));
            write_file(
                &root.join("queries").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.mutation_files {
            let name = format!("StandaloneMutation{i}");
            let content = operation_file(&fixtures::mutation(&mut self.rng, &name));
            write_file(
                &root.join("mutations").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        for i in 0..self.shape.subscription_files {
            let name = format!("StandaloneSubscription{i}");
            let content = operation_file(&fixtures::subscription(&mut self.rng, &name));
            write_file(
                &root.join("subscriptions").join(format!("{name}.ts")),
                &content,
                &mut self.stats,
            )?;
        }

        Ok(())
    }

    fn generate_entry_points(&mut self, dir: &Path) -> Result<()> {
        for i in 0..self.shape.extra_entry_points {
            let module = module_name(i % self.shape.modules.max(1));
            let content = format!(
                concat!(
                    "export * from './modules/{module}/components';\n",
                    "export * from './modules/{module}/services';\n",
                ),
                module = module,
            );
            write_file(
                &dir.join("src").join(format!("entry-{i}.ts")),
                &content,
                &mut self.stats,
            )?;
        }
        Ok(())
    }

    fn component(&mut self, name: &str) -> String {
        let with_query = self.rng.random_bool(self.shape.query_probability);
        let with_mutation = self.rng.random_bool(self.shape.mutation_probability);
        let with_subscription = self.rng.random_bool(self.shape.subscription_probability);

        let mut docs = String::new();
        if with_query {
            let complexity = self.rng.random_range(0..=2);
            docs.push_str(&fixtures::query(
                &mut self.rng,
                &format!("{name}Query"),
                complexity,
            ));
            docs.push('\n');
        }
        if with_mutation {
            docs.push_str(&fixtures::mutation(&mut self.rng, &format!("{name}Mutation")));
            docs.push('\n');
        }
        if with_subscription {
            docs.push_str(&fixtures::subscription(
                &mut self.rng,
                &format!("{name}Subscription"),
            ));
            docs.push('\n');
        }

        let gql_import = if docs.is_empty() {
            ""
        } else {
            "import { gql } from 'graphql-tag';\n"
        };
        format!(
            concat!(
                "import React from 'react';\n",
                "{gql_import}",
                "\n",
                "{docs}",
                "export function {name}(): JSX.Element {{\n",
                "  return <div className=\"{css}\" />;\n",
                "}}\n",
            ),
            gql_import = gql_import,
            docs = docs,
            name = name,
            css = name.to_lowercase(),
        )
    }

    fn service(&mut self, name: &str) -> String {
        let complexity = self.rng.random_range(0..=1);
        let query = fixtures::query(&mut self.rng, &format!("{name}Query"), complexity);
        let mutation = fixtures::mutation(&mut self.rng, &format!("{name}Mutation"));
        format!(
            concat!(
                "import {{ gql }} from 'graphql-tag';\n",
                "\n",
                "{query}",
                "\n",
                "{mutation}",
                "\n",
                "export class {name} {{\n",
                "  constructor(private readonly endpoint: string) {{}}\n",
                "}}\n",
            ),
            query = query,
            mutation = mutation,
            name = name,
        )
    }

    fn hook(&mut self, name: &str) -> String {
        let complexity = self.rng.random_range(0..=2);
        let query = fixtures::query(&mut self.rng, &format!("{name}Query"), complexity);
        format!(
            concat!(
                "import {{ gql }} from 'graphql-tag';\n",
                "import {{ useQuery }} from '@apollo/client';\n",
                "\n",
                "{query}",
                "\n",
                "export function use{name}() {{\n",
                "  return useQuery({name}QueryDocument);\n",
                "}}\n",
            ),
            query = query,
            name = name,
        )
    }
}

fn operation_file(doc: &str) -> String {
    format!("import {{ gql }} from 'graphql-tag';\n\n{doc}")
}
