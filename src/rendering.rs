use std::time::Instant;

use ratatui::{Frame, prelude::*};
use staffgrid_ui::widgets::top_bar_view::{TABLE_HOTKEYS, TabLabel, TopBarView};

use crate::{
    app::{APP_NAME, App},
    app_state::Tab,
};

const TOPBAR_HEIGHT: u16 = 3;
const SEARCH_HEIGHT: u16 = 3;

impl App {
    /// Renders the user interface.
    pub fn render(&mut self, frame: &mut Frame) {
        let status_height = u16::from(!self.status_line.message().is_empty());
        let [top_area, main_area, status_area] = Layout::vertical([
            Constraint::Length(TOPBAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(status_height),
        ])
        .areas(frame.area());

        let tabs: Vec<TabLabel> = Tab::ALL
            .iter()
            .map(|tab| TabLabel {
                title: tab.title().to_string(),
                count: self.table(*tab).visible_count(),
            })
            .collect();
        frame.render_widget(
            TopBarView {
                tabs: &tabs,
                active_tab: self.active_tab.index(),
                hotkeys: &TABLE_HOTKEYS,
                app_name: APP_NAME,
            },
            top_area,
        );

        let table_area = if self.search_filter.is_active {
            let [search_area, rest] =
                Layout::vertical([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)])
                    .areas(main_area);
            let fields = self.table(self.active_tab).search_fields();
            frame.render_widget(self.search_filter.view(fields), search_area);
            rest
        } else {
            main_area
        };

        let now = Instant::now();
        self.active_table().render(table_area, frame.buffer_mut(), now);

        if status_height > 0 {
            frame.render_widget(&self.status_line, status_area);
        }

        frame.render_widget(&self.modal_manager, frame.area());
    }
}
