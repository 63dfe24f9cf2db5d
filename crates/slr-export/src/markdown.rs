//! The PRISMA-aligned Markdown protocol: one section per upstream artifact,
//! concatenated in pipeline order. No formal schema is mandated (§9 Open
//! Questions) — scenario 6 in §8 is the binding check, so this renders
//! plain, readable headings rather than a rigid template.

use slr_artifact::{
    ConceptModel, DatabaseQueryPlan, ProblemFraming, ResearchQuestionSet, ScreeningCriteria,
    SearchResults,
};

fn heading(title: &str) -> String {
    format!("## {title}\n\n")
}

/// Renders the full protocol document. Each artifact is optional: a stage
/// that hasn't run yet (or wasn't approved) simply contributes no section,
/// matching the executor's "partial success still exports" policy.
#[must_use]
pub fn render_markdown_protocol(
    project_title: &str,
    problem_framing: Option<&ProblemFraming>,
    concept_model: Option<&ConceptModel>,
    research_questions: Option<&ResearchQuestionSet>,
    query_plan: Option<&DatabaseQueryPlan>,
    search_results: Option<&SearchResults>,
    screening_criteria: Option<&ScreeningCriteria>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Systematic Literature Review Protocol: {project_title}\n\n"));

    if let Some(pf) = problem_framing {
        out.push_str(&heading("Problem Statement"));
        out.push_str(&pf.problem_statement);
        out.push_str("\n\n");

        if !pf.goals.is_empty() {
            out.push_str(&heading("Goals"));
            for goal in &pf.goals {
                out.push_str(&format!("- {goal}\n"));
            }
            out.push('\n');
        }

        if !pf.scope_in.is_empty() || !pf.scope_out.is_empty() {
            out.push_str(&heading("Scope"));
            if !pf.scope_in.is_empty() {
                out.push_str("In scope:\n");
                for item in &pf.scope_in {
                    out.push_str(&format!("- {item}\n"));
                }
            }
            if !pf.scope_out.is_empty() {
                out.push_str("\nOut of scope:\n");
                for item in &pf.scope_out {
                    out.push_str(&format!("- {item}\n"));
                }
            }
            out.push('\n');
        }

        if let Some(gap) = &pf.research_gap {
            out.push_str(&heading("Research Gap"));
            out.push_str(gap);
            out.push_str("\n\n");
        }
    }

    if let Some(cm) = concept_model {
        out.push_str(&heading("Concepts"));
        for concept in &cm.concepts {
            out.push_str(&format!(
                "- **{}** ({:?}): {}\n",
                concept.label, concept.concept_type, concept.description
            ));
        }
        out.push('\n');
    }

    if let Some(rqs) = research_questions {
        out.push_str(&heading("Research Questions"));
        for q in &rqs.questions {
            out.push_str(&format!("- {}\n", q.text));
        }
        out.push('\n');
    }

    if let Some(plan) = query_plan {
        out.push_str(&heading("Search Strategy"));
        for query in &plan.queries {
            out.push_str(&format!("### {}\n\n", query.database_name));
            out.push_str(&format!("```\n{}\n```\n\n", query.boolean_query_string));
            out.push_str(&format!(
                "Complexity: {:?} ({} terms across {} blocks)\n\n",
                query.complexity_analysis.level,
                query.complexity_analysis.total_terms,
                query.complexity_analysis.num_blocks
            ));
        }
    }

    if let Some(results) = search_results {
        out.push_str(&heading("Search Results"));
        out.push_str(&format!(
            "Databases searched: {}\n\n",
            results.databases_searched.join(", ")
        ));
        out.push_str(&format!(
            "Total results: {}. After deduplication: {} ({} duplicates removed, {:.1}% rate).\n\n",
            results.total_results,
            results.deduplicated_count,
            results.deduplication_stats.duplicates_removed,
            results.deduplication_stats.rate * 100.0
        ));
    }

    if let Some(criteria) = screening_criteria {
        out.push_str(&heading("Screening Criteria"));
        if !criteria.inclusion_criteria.is_empty() {
            out.push_str("Inclusion:\n");
            for c in &criteria.inclusion_criteria {
                out.push_str(&format!("- {c}\n"));
            }
            out.push('\n');
        }
        if !criteria.exclusion_criteria.is_empty() {
            out.push_str("Exclusion:\n");
            for c in &criteria.exclusion_criteria {
                out.push_str(&format!("- {c}\n"));
            }
            out.push('\n');
        }
    }

    out
}
