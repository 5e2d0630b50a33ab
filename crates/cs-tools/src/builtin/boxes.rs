use anyhow::Result;
use async_trait::async_trait;
use cs_core::{BoxResult, BoxTable};
use std::sync::Arc;

use crate::schema::{ParamKind, ParameterSchema, Parameters};
use crate::sources::BoxLeagueSource;
use crate::tool::Tool;

/// Plain-text tables, one `Box` header per table and one stats line per player
pub fn render_box_tables(tables: &[BoxTable]) -> String {
    if tables.is_empty() {
        return "No box league tables found.".to_string();
    }

    tables
        .iter()
        .map(|table| {
            let mut lines = vec![table.name.clone()];
            for p in &table.players {
                lines.push(format!(
                    "{} - Played: {}, Won: {}, Lost: {}, Points: {}",
                    p.name, p.played, p.won, p.lost, p.points
                ));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain-text results grouped by box in the order they were reported
pub fn render_box_results(results: &[BoxResult]) -> String {
    if results.is_empty() {
        return "No box results found.".to_string();
    }

    let mut sections: Vec<(String, Vec<String>)> = Vec::new();
    for r in results {
        let line = format!("{} beat {} {}", r.winner, r.loser, r.score);
        match sections.iter_mut().find(|(name, _)| *name == r.box_name) {
            Some((_, lines)) => lines.push(line),
            None => sections.push((r.box_name.clone(), vec![line])),
        }
    }

    sections
        .into_iter()
        .map(|(name, lines)| format!("{}\n{}", name, lines.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn box_schema() -> ParameterSchema {
    ParameterSchema::new().optional("box", ParamKind::Integer, "Box number; omit for every box")
}

/// Box league positions
pub struct GetBoxPositionsTool {
    source: Arc<dyn BoxLeagueSource>,
}

impl GetBoxPositionsTool {
    pub fn new(source: Arc<dyn BoxLeagueSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetBoxPositionsTool {
    fn name(&self) -> &str {
        super::GET_BOX_POSITIONS
    }

    fn description(&self) -> &str {
        "Get the box league tables with each player's played, won, lost and points totals."
    }

    fn schema(&self) -> ParameterSchema {
        box_schema()
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        let tables = self.source.positions(params.get_u32("box")).await?;
        Ok(render_box_tables(&tables))
    }
}

/// Box league match results
pub struct GetBoxResultsTool {
    source: Arc<dyn BoxLeagueSource>,
}

impl GetBoxResultsTool {
    pub fn new(source: Arc<dyn BoxLeagueSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetBoxResultsTool {
    fn name(&self) -> &str {
        super::GET_BOX_RESULTS
    }

    fn description(&self) -> &str {
        "Get the completed box league matches with winner, loser and score."
    }

    fn schema(&self) -> ParameterSchema {
        box_schema()
    }

    async fn execute(&self, params: Parameters) -> Result<String> {
        let results = self.source.results(params.get_u32("box")).await?;
        Ok(render_box_results(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::PlayerStanding;

    fn result(box_name: &str, winner: &str, loser: &str) -> BoxResult {
        BoxResult {
            box_name: box_name.to_string(),
            winner: winner.to_string(),
            loser: loser.to_string(),
            score: "3-1".to_string(),
        }
    }

    #[test]
    fn test_render_tables() {
        let text = render_box_tables(&[BoxTable {
            name: "Box 1".to_string(),
            players: vec![PlayerStanding {
                name: "Alice Smith".to_string(),
                played: 4,
                won: 3,
                lost: 1,
                points: 16,
            }],
        }]);
        assert_eq!(
            text,
            "Box 1\nAlice Smith - Played: 4, Won: 3, Lost: 1, Points: 16"
        );
        assert_eq!(render_box_tables(&[]), "No box league tables found.");
    }

    #[test]
    fn test_render_results_groups_by_box() {
        let text = render_box_results(&[
            result("Box 1", "Alice Smith", "Bob Jones"),
            result("Box 2", "Carol White", "Dan Brown"),
            result("Box 1", "Bob Jones", "Eve Black"),
        ]);
        assert_eq!(
            text,
            "Box 1\nAlice Smith beat Bob Jones 3-1\nBob Jones beat Eve Black 3-1\n\n\
             Box 2\nCarol White beat Dan Brown 3-1"
        );
    }
}
