use minesweeper_agent::{Agent, Cell};
use rand::Rng;
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

/// The hidden board the agent plays against. It knows where the mines are; the
/// agent only ever sees the adjacent-mine counts it reports.
struct Board {
    height: usize,
    width: usize,
    mines: HashSet<Cell>,
}

impl Board {
    /// Places `mine_count` mines at distinct random cells.
    fn new<R: Rng>(height: usize, width: usize, mine_count: usize, rng: &mut R) -> Self {
        assert!(
            mine_count < height * width,
            "Mine count must be less than the number of cells on the board."
        );
        let mut mines = HashSet::new();
        while mines.len() != mine_count {
            mines.insert(Cell {
                row: rng.random_range(0..height),
                col: rng.random_range(0..width),
            });
        }
        Board {
            height,
            width,
            mines,
        }
    }

    /// Reveals a cell, reporting its adjacent-mine count or failing if the
    /// cell is a mine.
    fn reveal(&self, cell: Cell) -> anyhow::Result<usize> {
        if self.mines.contains(&cell) {
            anyhow::bail!("mine_hit");
        }
        Ok(self.nearby_mines(cell))
    }

    /// The number of mines within one row and column of a cell, the cell
    /// itself excluded.
    fn nearby_mines(&self, cell: Cell) -> usize {
        let mut count = 0;
        for dr in -1..=1isize {
            for dc in -1..=1isize {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let row = cell.row as isize + dr;
                let col = cell.col as isize + dc;
                if row >= 0
                    && row < self.height as isize
                    && col >= 0
                    && col < self.width as isize
                    && self.mines.contains(&Cell {
                        row: row as usize,
                        col: col as usize,
                    })
                {
                    count += 1;
                }
            }
        }
        count
    }
}

fn main() {
    // --- 1. Initialization ---
    let mut rng = rand::rng();
    let board = Board::new(10, 10, 15, &mut rng);
    let mut agent = Agent::new(board.height, board.width);

    println!("--- Autonomous Minesweeper Bot ---");
    println!("Strategy: Prioritize deduced safe moves, guess randomly otherwise.");
    thread::sleep(Duration::from_secs(2));

    // --- 2. Game Loop ---
    let to_win = board.height * board.width - board.mines.len();
    let mut move_count = 0;
    let won = loop {
        if agent.moves_made().len() == to_win {
            break true;
        }
        move_count += 1;
        println!("\n--- Move #{} ---", move_count);

        // --- 3. Bot's Decision Logic ---
        let cell = if let Some(cell) = agent.choose_safe_move() {
            println!("Deduction found a guaranteed safe cell.");
            cell
        } else if let Some(cell) = agent.choose_random_move(&mut rng) {
            println!("No deduced safe move available. Making a random guess...");
            cell
        } else {
            // Every remaining cell is played or a known mine.
            println!("No valid moves left for the bot to make.");
            break false;
        };

        // --- 4. Execute the Chosen Move ---
        println!("Bot reveals ({}, {})...", cell.row, cell.col);
        match board.reveal(cell) {
            Ok(count) => agent.record_observation(cell, count),
            Err(_) => break false,
        }

        print_board(&board, &agent);

        // Add a delay to make the game watchable
        thread::sleep(Duration::from_millis(500));
    };

    // --- 5. Final Result ---
    println!("\n--- Game Over ---");
    if won {
        println!("Result: The bot won!");
        println!("Mines identified: {}/{}", agent.mines().len(), board.mines.len());
    } else {
        println!("Result: The bot hit a mine and lost.");
    }
}

/// Prints the board as the agent sees it: revealed counts, flagged mines, and
/// unexplored cells.
fn print_board(board: &Board, agent: &Agent) {
    // Print header
    print!("   ");
    for col in 0..board.width {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(board.width));

    // Print rows
    for row in 0..board.height {
        print!("{:^2}|", row);
        for col in 0..board.width {
            let cell = Cell { row, col };
            let display = if agent.moves_made().contains(&cell) {
                format!(" {} ", board.nearby_mines(cell))
            } else if agent.mines().contains(&cell) {
                " F ".to_string()
            } else {
                " ■ ".to_string()
            };
            print!("{}", display);
        }
        println!();
    }
}
