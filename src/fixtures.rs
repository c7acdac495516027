//! Fixture primitives for synthetic workloads.
//!
//! Pure functions over a seeded PRNG that return GraphQL (or
//! TypeScript-hosting-GraphQL) snippets. Every operation is embedded in a
//! tagged template literal so the Generator's document scanner picks it up:
//! either `` gql` `` or the `` /* GraphQL */` `` sentinel.
//!
//! Determinism matters more than realism here: all variation flows through
//! the caller's [`StdRng`], never through time or global state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed for all workload generation.
pub const WORKLOAD_SEED: u64 = 42;

/// The PRNG every workload generator owns.
#[must_use]
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(WORKLOAD_SEED)
}

/// Component name suffixes used to vary generated component files.
pub const COMPONENT_SUFFIXES: &[&str] = &[
    "List", "Detail", "Form", "Card", "Table", "Modal", "Panel", "Sidebar",
];

/// Widget families for shared components.
pub const WIDGET_FAMILIES: &[&str] = &[
    "Avatar", "Badge", "Banner", "Breadcrumb", "Spinner", "Tooltip", "Tabs", "Toggle",
];

/// Uniform selection from a fixed option set.
pub fn choose<'a>(rng: &mut StdRng, options: &'a [&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

/// Entities the snippets select over. The names line up with
/// `testdata/schema.graphql`.
const ENTITIES: &[&str] = &["User", "Post", "Comment"];

const MUTATION_VERBS: &[&str] = &["create", "update", "delete"];

fn entity_fields(entity: &str) -> &'static str {
    match entity {
        "User" => "    id\n    name\n    email\n    avatarUrl\n",
        "Post" => "    id\n    title\n    body\n    publishedAt\n",
        _ => "    id\n    body\n    createdAt\n",
    }
}

fn entity_root(entity: &str) -> &'static str {
    match entity {
        "User" => "users",
        "Post" => "posts",
        _ => "comments",
    }
}

fn wrap_gql(name: &str, body: &str) -> String {
    format!("export const {name}Document = gql`\n{body}`;\n")
}

/// A named fragment over a random entity.
pub fn fragment(rng: &mut StdRng, name: &str) -> String {
    let entity = choose(rng, ENTITIES);
    let fields = entity_fields(entity);
    wrap_gql(
        name,
        &format!("  fragment {name} on {entity} {{\n{fields}  }}\n"),
    )
}

/// A query at one of three complexity tiers.
///
/// Tier 0 is a flat selection, tier 1 adds one connection layer
/// (edges/node/pageInfo), tier 2 nests two connection layers and adds
/// conditional directives and union spreads.
pub fn query(rng: &mut StdRng, name: &str, complexity: u8) -> String {
    let entity = choose(rng, ENTITIES);
    let root = entity_root(entity);
    let fields = entity_fields(entity);
    let body = match complexity {
        0 => format!("  query {name} {{\n  {root} {{\n{fields}  }}\n  }}\n"),
        1 => format!(
            concat!(
                "  query {name}($first: Int) {{\n",
                "    {root}Connection(first: $first) {{\n",
                "      edges {{\n",
                "        node {{\n",
                "      {fields}",
                "        }}\n",
                "      }}\n",
                "      pageInfo {{\n",
                "        hasNextPage\n",
                "        endCursor\n",
                "      }}\n",
                "    }}\n",
                "  }}\n",
            ),
            name = name,
            root = root,
            fields = fields,
        ),
        _ => format!(
            concat!(
                "  query {name}($term: String!, $first: Int, $withMeta: Boolean!, $skipAuthor: Boolean!) {{\n",
                "    search(term: $term, first: $first) {{\n",
                "      edges {{\n",
                "        node {{\n",
                "          ... on User {{\n",
                "            id\n",
                "            name\n",
                "            email\n",
                "          }}\n",
                "          ... on Post {{\n",
                "            id\n",
                "            title\n",
                "            comments(first: 5) {{\n",
                "              edges {{\n",
                "                node {{\n",
                "                  id\n",
                "                  body\n",
                "                  author @skip(if: $skipAuthor) {{\n",
                "                    id\n",
                "                    name\n",
                "                  }}\n",
                "                }}\n",
                "              }}\n",
                "              pageInfo {{\n",
                "                hasNextPage\n",
                "              }}\n",
                "            }}\n",
                "          }}\n",
                "          ... on Comment {{\n",
                "            id\n",
                "            body\n",
                "          }}\n",
                "        }}\n",
                "      }}\n",
                "      pageInfo {{\n",
                "        hasNextPage\n",
                "        hasPreviousPage\n",
                "        startCursor\n",
                "        endCursor\n",
                "      }}\n",
                "    }}\n",
                "    viewer @include(if: $withMeta) {{\n",
                "      id\n",
                "      name\n",
                "      metadata\n",
                "    }}\n",
                "  }}\n",
            ),
            name = name,
        ),
    };
    wrap_gql(name, &body)
}

/// A create/update/delete mutation over a random entity.
pub fn mutation(rng: &mut StdRng, name: &str) -> String {
    let entity = choose(rng, ENTITIES);
    let verb = choose(rng, MUTATION_VERBS);
    let fields = entity_fields(entity);
    let body = format!(
        concat!(
            "  mutation {name}($input: {entity}Input!) {{\n",
            "    {verb}{entity}(input: $input) {{\n",
            "    {fields}",
            "      updatedAt\n",
            "    }}\n",
            "  }}\n",
        ),
        name = name,
        entity = entity,
        verb = verb,
        fields = fields,
    );
    wrap_gql(name, &body)
}

/// A subscription over a random entity's change feed.
pub fn subscription(rng: &mut StdRng, name: &str) -> String {
    let entity = choose(rng, ENTITIES);
    let fields = entity_fields(entity);
    let body = format!(
        concat!(
            "  subscription {name} {{\n",
            "    {root}Changed {{\n",
            "    {fields}",
            "    }}\n",
            "  }}\n",
        ),
        name = name,
        root = entity_root(entity),
        fields = fields,
    );
    wrap_gql(name, &body)
}

/// A utility file. Complex utils host a document via the `/* GraphQL */`
/// sentinel instead of the `gql` tag; simple ones carry no document at all.
#[must_use]
pub fn util_file(name: &str, is_complex: bool) -> String {
    if is_complex {
        format!(
            concat!(
                "import type {{ DocumentNode }} from 'graphql';\n",
                "\n",
                "export const {name}StatsDocument: DocumentNode = /* GraphQL */`\n",
                "  query {name}Stats {{\n",
                "    stats {{\n",
                "      totalUsers\n",
                "      totalPosts\n",
                "      totalComments\n",
                "    }}\n",
                "  }}\n",
                "`;\n",
                "\n",
                "export function format{name}(value: number): string {{\n",
                "  return new Intl.NumberFormat().format(value);\n",
                "}}\n",
            ),
            name = name,
        )
    } else {
        format!(
            concat!(
                "export function {lower}Key(id: string): string {{\n",
                "  return `{lower}:${{id}}`;\n",
                "}}\n",
                "\n",
                "export function is{name}Key(key: string): boolean {{\n",
                "  return key.startsWith('{lower}:');\n",
                "}}\n",
            ),
            name = name,
            lower = name.to_lowercase(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_is_deterministic_for_a_fixed_seed() {
        let mut a = seeded_rng();
        let mut b = seeded_rng();
        for _ in 0..100 {
            assert_eq!(
                choose(&mut a, COMPONENT_SUFFIXES),
                choose(&mut b, COMPONENT_SUFFIXES)
            );
        }
    }

    #[test]
    fn snippets_carry_exactly_one_tag() {
        let mut rng = seeded_rng();
        for snippet in [
            fragment(&mut rng, "UserFields"),
            query(&mut rng, "GetUsers", 0),
            query(&mut rng, "GetUsersPaged", 1),
            query(&mut rng, "SearchAll", 2),
            mutation(&mut rng, "SaveUser"),
            subscription(&mut rng, "OnUserChanged"),
        ] {
            assert_eq!(snippet.matches("gql`").count(), 1, "in: {snippet}");
        }
        assert_eq!(
            util_file("Dashboard", true).matches("/* GraphQL */`").count(),
            1
        );
        assert_eq!(
            util_file("Dashboard", false).matches("/* GraphQL */`").count(),
            0
        );
    }

    #[test]
    fn tier_two_queries_use_directives_and_union_spreads() {
        let mut rng = seeded_rng();
        let q = query(&mut rng, "SearchAll", 2);
        assert!(q.contains("@include(if:"));
        assert!(q.contains("@skip(if:"));
        assert!(q.contains("... on User"));
        assert!(q.contains("... on Post"));
        assert!(q.contains("... on Comment"));
    }

    #[test]
    fn tier_one_queries_nest_a_connection() {
        let mut rng = seeded_rng();
        let q = query(&mut rng, "GetPaged", 1);
        assert!(q.contains("edges {"));
        assert!(q.contains("node {"));
        assert!(q.contains("pageInfo {"));
    }
}
